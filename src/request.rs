//! Extraction of tunnel requests from form fields.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::{Result, TunnelError};

/// Where and as whom to connect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectParams {
    pub host: String,
    /// `None` when the client left the port empty.
    pub port: Option<u16>,
    pub login: String,
    pub password: String,
    pub database: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `actn=C`
    ConnectionTest,
    /// `actn=Q`, statements in submission order with blanks removed.
    QueryBatch(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelRequest {
    pub action: Action,
    pub params: ConnectParams,
}

const REQUIRED_FIELDS: [&str; 4] = ["actn", "host", "port", "login"];

fn field<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

impl TunnelRequest {
    /// Build a request from decoded form fields. Repeated `q` (or `q[]`)
    /// fields are the statements of a batch.
    pub fn from_form(fields: &[(String, String)]) -> Result<Self> {
        if REQUIRED_FIELDS
            .iter()
            .any(|name| field(fields, name).is_none())
        {
            return Err(TunnelError::MissingParameters);
        }

        let params = ConnectParams {
            host: field(fields, "host").unwrap_or_default().to_string(),
            port: parse_port(field(fields, "port").unwrap_or_default())?,
            login: field(fields, "login").unwrap_or_default().to_string(),
            password: field(fields, "password").unwrap_or_default().to_string(),
            database: field(fields, "db")
                .filter(|db| !db.is_empty())
                .map(str::to_string),
        };

        let action = match field(fields, "actn").unwrap_or_default() {
            "C" => Action::ConnectionTest,
            "Q" => {
                let base64 = field(fields, "encodeBase64") == Some("1");
                Action::QueryBatch(collect_statements(fields, base64)?)
            }
            other => return Err(TunnelError::InvalidAction(other.to_string())),
        };

        Ok(Self { action, params })
    }
}

fn parse_port(port: &str) -> Result<Option<u16>> {
    let port = port.trim();
    if port.is_empty() {
        return Ok(None);
    }
    port.parse()
        .map(Some)
        .map_err(|_| TunnelError::InvalidParameter(format!("port '{}' is not a number", port)))
}

fn collect_statements(fields: &[(String, String)], base64: bool) -> Result<Vec<String>> {
    let mut statements = Vec::new();

    for (index, (_, value)) in fields
        .iter()
        .filter(|(key, _)| key == "q" || key == "q[]")
        .enumerate()
    {
        let statement = if base64 {
            decode_statement(value).ok_or_else(|| {
                TunnelError::InvalidParameter(format!("statement {} is not base64 UTF-8", index + 1))
            })?
        } else {
            value.clone()
        };

        if !statement.trim().is_empty() {
            statements.push(statement);
        }
    }

    Ok(statements)
}

fn decode_statement(value: &str) -> Option<String> {
    let bytes = BASE64.decode(value.trim()).ok()?;
    String::from_utf8(bytes).ok()
}
