//! JSON bodies exchanged with the device API.
//!
//! The device speaks Portuguese field names (`conectado`, `valorBruto`,
//! `bomba`, `sucesso`, …); they are renamed here and never leak past this
//! module.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use irrigator_domain::pump::{CommandAck, PumpState};
use irrigator_domain::status::DeviceStatus;

/// Body of `GET /api/status`.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "conectado", default)]
    pub connected: bool,
    #[serde(rename = "valorBruto", default)]
    pub raw_value: Option<f64>,
    #[serde(rename = "bomba", default)]
    pub pump: Option<String>,
    #[serde(rename = "ultimaAtualizacao", default)]
    pub last_update: Option<String>,
}

impl From<StatusResponse> for DeviceStatus {
    fn from(body: StatusResponse) -> Self {
        let last_update = body.last_update.as_deref().and_then(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|ts| ts.with_timezone(&Utc))
                .inspect_err(|err| tracing::debug!(%raw, error = %err, "ignoring bad timestamp"))
                .ok()
        });
        Self {
            connected: body.connected,
            raw_value: body.raw_value,
            pump: body
                .pump
                .as_deref()
                .map_or(PumpState::Off, PumpState::from_wire),
            last_update,
        }
    }
}

/// Body of `POST /api/bomba/ligar` and `POST /api/bomba/desligar`.
#[derive(Debug, Deserialize)]
pub struct CommandResponse {
    #[serde(rename = "sucesso", default)]
    pub success: bool,
    #[serde(rename = "mensagem", default)]
    pub message: Option<String>,
}

impl From<CommandResponse> for CommandAck {
    fn from(body: CommandResponse) -> Self {
        Self {
            success: body.success,
            message: body.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn status(json: &str) -> DeviceStatus {
        serde_json::from_str::<StatusResponse>(json).unwrap().into()
    }

    #[test]
    fn should_decode_full_status() {
        let st = status(
            r#"{"conectado":true,"valorBruto":287,"bomba":"ON","ultimaAtualizacao":"2024-05-01T12:30:00.000Z"}"#,
        );
        assert!(st.connected);
        assert_eq!(st.raw_value, Some(287.0));
        assert_eq!(st.pump, PumpState::On);
        assert_eq!(
            st.last_update,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn should_tolerate_missing_reading_and_timestamp() {
        let st = status(r#"{"conectado":false,"bomba":"OFF"}"#);
        assert!(!st.connected);
        assert!(st.raw_value.is_none());
        assert!(st.last_update.is_none());
    }

    #[test]
    fn should_treat_null_reading_as_missing() {
        let st = status(r#"{"conectado":true,"valorBruto":null,"bomba":"OFF"}"#);
        assert!(st.raw_value.is_none());
    }

    #[test]
    fn should_read_unknown_pump_value_as_off() {
        let st = status(r#"{"conectado":true,"valorBruto":400,"bomba":"???"}"#);
        assert_eq!(st.pump, PumpState::Off);
    }

    #[test]
    fn should_ignore_unparseable_timestamp() {
        let st = status(r#"{"conectado":true,"ultimaAtualizacao":"yesterday"}"#);
        assert!(st.last_update.is_none());
    }

    #[test]
    fn should_convert_timestamp_offset_to_utc() {
        let st = status(r#"{"conectado":true,"ultimaAtualizacao":"2024-05-01T09:30:00-03:00"}"#);
        assert_eq!(
            st.last_update,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn should_decode_command_rejection() {
        let ack: CommandAck = serde_json::from_str::<CommandResponse>(
            r#"{"sucesso":false,"mensagem":"Arduino não conectado"}"#,
        )
        .unwrap()
        .into();
        assert_eq!(ack, CommandAck::rejected("Arduino não conectado"));
    }

    #[test]
    fn should_decode_bare_command_success() {
        let ack: CommandAck = serde_json::from_str::<CommandResponse>(r#"{"sucesso":true}"#)
            .unwrap()
            .into();
        assert_eq!(ack, CommandAck::accepted());
    }
}
