use async_trait::async_trait;
use pillbox_core::{
    config::{SupabaseConfig, SupabaseSchema},
    MedicineRecord, NewMedicine,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::{
    error::{Result, StoreError},
    store::MedicineStore,
};

/// Record store backed by a hosted Supabase table, reached through its
/// PostgREST interface (`/rest/v1/<table>`).
///
/// The table is expected to exist already. With the standard schema it has
/// the same columns as the SQLite one and `deleted` as a boolean; with the
/// legacy schema it is `remedios` with Portuguese columns and `excluido`.
pub struct SupabaseStore {
    client: reqwest::Client,
    api_key: String,
    table_url: String,
    schema: SupabaseSchema,
}

/// Wire shape of a row in either schema. Older rows may carry NULLs in the
/// optional columns.
#[derive(Debug, Deserialize)]
struct RemoteRow {
    id: i64,
    #[serde(alias = "nome")]
    name: String,
    #[serde(alias = "quantidade")]
    quantity: String,
    #[serde(alias = "frequencia")]
    frequency: String,
    #[serde(default, alias = "telefone")]
    phone: Option<String>,
    #[serde(alias = "data_inicio")]
    start_date: String,
    #[serde(alias = "data_fim")]
    end_date: String,
    #[serde(default, alias = "excluido")]
    deleted: Option<DeletedFlag>,
}

/// `deleted` is a boolean; legacy `excluido` is `'S'` (yes) or `'N'` (no).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeletedFlag {
    Bool(bool),
    Text(String),
}

impl DeletedFlag {
    fn is_set(&self) -> bool {
        match self {
            DeletedFlag::Bool(b) => *b,
            DeletedFlag::Text(t) => t.eq_ignore_ascii_case("S"),
        }
    }
}

impl From<RemoteRow> for MedicineRecord {
    fn from(r: RemoteRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            quantity: r.quantity,
            frequency: r.frequency,
            phone: r.phone.unwrap_or_default(),
            start_date: r.start_date,
            end_date: r.end_date,
            deleted: r.deleted.is_some_and(|d| d.is_set()),
        }
    }
}

impl SupabaseStore {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &SupabaseConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            table_url: table_url(&config.url, config.table_name()),
            schema: config.schema,
        }
    }

    fn request(&self, method: Method, query: &str) -> RequestBuilder {
        let url = if query.is_empty() {
            self.table_url.clone()
        } else {
            format!("{}?{}", self.table_url, query)
        };
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// PostgREST filter selecting rows that are not soft-deleted.
    fn active_filter(&self) -> &'static str {
        match self.schema {
            SupabaseSchema::Standard => "deleted=eq.false",
            SupabaseSchema::Legacy => "excluido=eq.N",
        }
    }

    fn deleted_column(&self, deleted: bool) -> (&'static str, Value) {
        match self.schema {
            SupabaseSchema::Standard => ("deleted", json!(deleted)),
            SupabaseSchema::Legacy => ("excluido", json!(if deleted { "S" } else { "N" })),
        }
    }

    /// Column values for `medicine`; the deleted flag is left alone.
    fn fields(&self, medicine: &NewMedicine) -> Value {
        match self.schema {
            SupabaseSchema::Standard => json!({
                "name": medicine.name,
                "quantity": medicine.quantity,
                "frequency": medicine.frequency,
                "phone": medicine.phone,
                "start_date": medicine.start_date,
                "end_date": medicine.end_date,
            }),
            SupabaseSchema::Legacy => json!({
                "nome": medicine.name,
                "quantidade": medicine.quantity,
                "frequencia": medicine.frequency,
                "telefone": medicine.phone,
                "data_inicio": medicine.start_date,
                "data_fim": medicine.end_date,
            }),
        }
    }

    fn insert_body(&self, medicine: &NewMedicine) -> Value {
        let mut body = self.fields(medicine);
        let (column, value) = self.deleted_column(false);
        body[column] = value;
        body
    }

    fn soft_delete_body(&self) -> Value {
        let (column, value) = self.deleted_column(true);
        json!({ column: value })
    }

    /// Send a request that returns the affected rows.
    async fn fetch_rows(&self, req: RequestBuilder) -> Result<Vec<MedicineRecord>> {
        let resp = check(req.send().await?).await?;
        let rows: Vec<RemoteRow> = resp.json().await?;
        Ok(rows.into_iter().map(MedicineRecord::from).collect())
    }

    /// Like `fetch_rows`, but an empty result means the id did not exist.
    async fn mutate_one(&self, id: i64, req: RequestBuilder) -> Result<()> {
        let rows = self
            .fetch_rows(req.header("Prefer", "return=representation"))
            .await?;
        if rows.is_empty() {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }
}

#[async_trait]
impl MedicineStore for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn insert(&self, medicine: &NewMedicine) -> Result<MedicineRecord> {
        medicine.validate()?;
        let req = self
            .request(Method::POST, "")
            .header("Prefer", "return=representation")
            .json(&self.insert_body(medicine));
        let record = self
            .fetch_rows(req)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Remote {
                status: 200,
                message: "insert returned no row".to_string(),
            })?;
        info!(record_id = record.id, name = %record.name, "medicine inserted");
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<MedicineRecord>> {
        let req = self.request(Method::GET, &format!("select=*&id=eq.{id}"));
        Ok(self.fetch_rows(req).await?.into_iter().next())
    }

    async fn list_active(&self) -> Result<Vec<MedicineRecord>> {
        let query = format!("select=*&{}&order=id.asc", self.active_filter());
        let records = self.fetch_rows(self.request(Method::GET, &query)).await?;
        debug!(count = records.len(), "listed active medicines");
        Ok(records)
    }

    async fn update(&self, id: i64, medicine: &NewMedicine) -> Result<()> {
        medicine.validate()?;
        let req = self
            .request(Method::PATCH, &format!("id=eq.{id}"))
            .json(&self.fields(medicine));
        self.mutate_one(id, req).await?;
        info!(record_id = id, "medicine updated");
        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<()> {
        let req = self
            .request(Method::PATCH, &format!("id=eq.{id}"))
            .json(&self.soft_delete_body());
        self.mutate_one(id, req).await?;
        info!(record_id = id, "medicine marked deleted");
        Ok(())
    }

    async fn hard_delete(&self, id: i64) -> Result<()> {
        let req = self.request(Method::DELETE, &format!("id=eq.{id}"));
        self.mutate_one(id, req).await?;
        info!(record_id = id, "medicine removed");
        Ok(())
    }
}

fn table_url(base: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base.trim_end_matches('/'), table)
}

async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %message, "Supabase API error");
    Err(StoreError::Remote {
        status: status.as_u16(),
        message,
    })
}
