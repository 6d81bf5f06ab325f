use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveTime};
use pillbox_core::{
    config::{NotifyConfig, PillboxConfig, TransportKind},
    dates,
    session::SessionState,
    MedicineUpdate, NewMedicine,
};
use pillbox_notify::{build_notifier, Notifier, TwilioNotifier};
use pillbox_scheduler::{ReminderJob, SchedulerLoop, TickOutcome};
use pillbox_store::{open_store, MedicineStore};
use tracing::info;

use crate::cli::{AddArgs, EditArgs};
use crate::views;

pub async fn add(store: &dyn MedicineStore, args: AddArgs) -> anyhow::Result<()> {
    let today = dates::today_canonical();
    let medicine = NewMedicine {
        name: args.name,
        quantity: args.quantity,
        frequency: args.frequency,
        phone: args.phone,
        start_date: args
            .start
            .as_deref()
            .map(dates::to_canonical)
            .unwrap_or_else(|| today.clone()),
        end_date: args
            .end
            .as_deref()
            .map(dates::to_canonical)
            .unwrap_or(today),
    };
    let state = SessionState::register();
    let record = store.insert(&medicine).await?;
    println!("{}", views::render(&state, &[record]));
    Ok(())
}

pub async fn list(store: &dyn MedicineStore) -> anyhow::Result<()> {
    let records = store.list_active().await?;
    println!("{}", views::render(&SessionState::default(), &records));
    Ok(())
}

pub async fn edit(store: &dyn MedicineStore, id: i64, fields: EditArgs) -> anyhow::Result<()> {
    let update = MedicineUpdate::from(fields);
    if update.is_empty() {
        bail!("nothing to change; pass at least one field");
    }
    let state = SessionState::editing(id);
    let current = store
        .get(id)
        .await?
        .ok_or_else(|| anyhow!("medicine #{id} not found"))?;
    store.update(id, &update.apply(current)).await?;

    let updated = store
        .get(id)
        .await?
        .ok_or_else(|| anyhow!("medicine #{id} vanished during update"))?;
    println!("{}", views::render(&state, &[updated]));
    Ok(())
}

pub async fn remove(store: &dyn MedicineStore, id: i64, hard: bool) -> anyhow::Result<()> {
    if hard {
        store.hard_delete(id).await?;
        println!("Medicine #{id} deleted permanently.");
    } else {
        store.soft_delete(id).await?;
        println!("Medicine #{id} removed.");
    }
    Ok(())
}

pub async fn run(config: &PillboxConfig, dry_run: bool) -> anyhow::Result<()> {
    let job = build_job(config, dry_run)?;
    let poll = Duration::from_secs(config.reminders.poll_interval_secs.max(1));
    let scheduler = SchedulerLoop::new(job, poll);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            let _ = shutdown_tx.send(true);
        }
    });

    scheduler.run(shutdown_rx).await;
    Ok(())
}

pub async fn tick(config: &PillboxConfig, at: Option<&str>, dry_run: bool) -> anyhow::Result<()> {
    let job = build_job(config, dry_run)?;
    let outcome = match at {
        Some(hhmm) => {
            let time = NaiveTime::parse_from_str(hhmm, "%H:%M")
                .with_context(|| format!("--at expects HH:MM, got {hhmm:?}"))?;
            job.run_at(Local::now().date_naive().and_time(time)).await?
        }
        None => job.run().await?,
    };
    match outcome {
        TickOutcome::NotDue => println!("Not a trigger time; nothing sent."),
        TickOutcome::NothingToSend => println!("No active medicines; nothing sent."),
        TickOutcome::Dispatched { delivered, failed } => {
            println!("Digest sent: {delivered} delivered, {failed} failed.")
        }
    }
    Ok(())
}

pub async fn send_test(
    config: &PillboxConfig,
    destination: &str,
    message: &str,
    template: Option<&str>,
    vars: &[String],
) -> anyhow::Result<()> {
    let twilio = config
        .notify
        .twilio
        .as_ref()
        .context("send-test needs [notify.twilio] credentials")?;
    let notifier = TwilioNotifier::new(twilio);

    let sid = match template {
        Some(content_sid) => {
            let variables = parse_vars(vars)?;
            notifier
                .send_template(destination, content_sid, &variables)
                .await?
        }
        None => notifier.send(destination, message).await?,
    };
    println!("Message sent to {destination}. SID: {sid}");
    Ok(())
}

fn build_job(config: &PillboxConfig, dry_run: bool) -> anyhow::Result<ReminderJob> {
    let store = open_store(&config.store).context("opening record store")?;
    let notify = if dry_run {
        NotifyConfig {
            transport: TransportKind::Console,
            twilio: None,
        }
    } else {
        config.notify.clone()
    };
    let notifier: Arc<dyn Notifier> = build_notifier(&notify).context("building transport")?;
    Ok(ReminderJob::new(store, notifier, &config.reminders))
}

fn parse_vars(vars: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    vars.iter()
        .map(|kv| {
            kv.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| anyhow!("--var expects KEY=VALUE, got {kv:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillbox_store::SqliteStore;

    fn memory_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn add_args(name: &str) -> AddArgs {
        AddArgs {
            name: name.to_string(),
            quantity: "1 tablet".to_string(),
            frequency: "every 12 hours".to_string(),
            phone: String::new(),
            start: Some("05/01/2024".to_string()),
            end: None,
        }
    }

    #[test]
    fn vars_are_split_on_first_equals() {
        let vars = parse_vars(&["1=12/1".to_string(), "2=a=b".to_string()]).unwrap();
        assert_eq!(vars["1"], "12/1");
        assert_eq!(vars["2"], "a=b");
        assert!(parse_vars(&["novalue".to_string()]).is_err());
    }

    #[tokio::test]
    async fn add_stores_canonical_dates_with_today_default() {
        let store = memory_store();
        add(&store, add_args("Losartan")).await.unwrap();
        let records = store.list_active().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_date, "2024-01-05");
        assert_eq!(records[0].end_date, dates::today_canonical());
    }

    #[tokio::test]
    async fn edit_changes_only_given_fields() {
        let store = memory_store();
        add(&store, add_args("Losartan")).await.unwrap();
        let id = store.list_active().await.unwrap()[0].id;

        let fields = EditArgs {
            name: None,
            quantity: Some("2 tablets".to_string()),
            frequency: None,
            phone: None,
            start: None,
            end: None,
        };
        edit(&store, id, fields).await.unwrap();

        let r = store.get(id).await.unwrap().unwrap();
        assert_eq!(r.name, "Losartan");
        assert_eq!(r.quantity, "2 tablets");
    }

    #[tokio::test]
    async fn edit_without_fields_is_refused() {
        let store = memory_store();
        let fields = EditArgs {
            name: None,
            quantity: None,
            frequency: None,
            phone: None,
            start: None,
            end: None,
        };
        assert!(edit(&store, 1, fields).await.is_err());
    }

    #[tokio::test]
    async fn remove_soft_then_hard() {
        let store = memory_store();
        add(&store, add_args("Losartan")).await.unwrap();
        let id = store.list_active().await.unwrap()[0].id;

        remove(&store, id, false).await.unwrap();
        assert!(store.list_active().await.unwrap().is_empty());
        assert!(store.get(id).await.unwrap().is_some());

        remove(&store, id, true).await.unwrap();
        assert!(store.get(id).await.unwrap().is_none());
    }
}
