//! External representation of a client used at the service boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::TypeConstraintError;

/// One-to-one projection of [`Client`]. `id` is absent on payloads that have
/// not been persisted yet and is ignored on insert and update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    #[serde(default)]
    pub id: Option<i32>,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 14))]
    pub cpf: Option<String>,
    #[validate(range(min = 0.0))]
    pub income: f64,
    pub birth_date: DateTime<Utc>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub children: i32,
}

impl ClientDto {
    /// Builds an unsaved DTO without CPF or children.
    pub fn new(name: impl Into<String>, income: f64, birth_date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: name.into(),
            cpf: None,
            income,
            birth_date,
            children: 0,
        }
    }
}

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        Self {
            id: Some(client.id.get()),
            name: client.name.into_inner(),
            cpf: client.cpf.map(|cpf| cpf.into_inner()),
            income: client.income.get(),
            birth_date: client.birth_date,
            children: client.children.get(),
        }
    }
}

impl TryFrom<&ClientDto> for NewClient {
    type Error = TypeConstraintError;

    fn try_from(dto: &ClientDto) -> Result<Self, Self::Error> {
        NewClient::try_new(
            dto.name.as_str(),
            dto.cpf.clone(),
            dto.income,
            dto.birth_date,
            dto.children,
        )
    }
}

impl TryFrom<&ClientDto> for UpdateClient {
    type Error = TypeConstraintError;

    fn try_from(dto: &ClientDto) -> Result<Self, Self::Error> {
        UpdateClient::try_new(
            dto.name.as_str(),
            dto.cpf.clone(),
            dto.income,
            dto.birth_date,
            dto.children,
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::types::{ChildrenCount, ClientId, ClientName, Cpf, Income};

    fn birth_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn client_maps_every_field() {
        let client = Client {
            id: ClientId::new(1).unwrap(),
            name: ClientName::new("Fulano").unwrap(),
            cpf: Some(Cpf::new("123.456.789-00").unwrap()),
            income: Income::new(5000.0).unwrap(),
            birth_date: birth_date(),
            children: ChildrenCount::new(2).unwrap(),
        };

        let dto = ClientDto::from(client);

        assert_eq!(dto.id, Some(1));
        assert_eq!(dto.name, "Fulano");
        assert_eq!(dto.cpf.as_deref(), Some("123.456.789-00"));
        assert_eq!(dto.income, 5000.0);
        assert_eq!(dto.birth_date, birth_date());
        assert_eq!(dto.children, 2);
    }

    #[test]
    fn new_client_ignores_supplied_id() {
        let mut dto = ClientDto::new("Fulano", 5000.0, birth_date());
        dto.id = Some(42);
        let new_client = NewClient::try_from(&dto).unwrap();
        assert_eq!(new_client.name.as_str(), "Fulano");
        assert_eq!(new_client.income.get(), 5000.0);
    }

    #[test]
    fn validation_rejects_negative_values() {
        let mut dto = ClientDto::new("Fulano", -1.0, birth_date());
        dto.children = -2;
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("income"));
        assert!(fields.contains_key("children"));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let dto = ClientDto::new("Fulano", 5000.0, birth_date());
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["birthDate"], "2023-01-01T00:00:00Z");
        assert_eq!(value["name"], "Fulano");
        assert!(value["id"].is_null());
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let dto: ClientDto = serde_json::from_str(
            r#"{"name":"Ana","income":3000.0,"birthDate":"1990-05-15T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(dto.id, None);
        assert_eq!(dto.cpf, None);
        assert_eq!(dto.children, 0);
    }
}
