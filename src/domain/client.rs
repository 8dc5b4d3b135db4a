use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ChildrenCount, ClientId, ClientName, Cpf, Income, TypeConstraintError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: ClientName,
    pub cpf: Option<Cpf>,
    pub income: Income,
    pub birth_date: DateTime<Utc>,
    pub children: ChildrenCount,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewClient {
    pub name: ClientName,
    pub cpf: Option<Cpf>,
    pub income: Income,
    pub birth_date: DateTime<Utc>,
    pub children: ChildrenCount,
}

impl NewClient {
    #[must_use]
    pub fn new(
        name: ClientName,
        cpf: Option<Cpf>,
        income: Income,
        birth_date: DateTime<Utc>,
        children: ChildrenCount,
    ) -> Self {
        Self {
            name,
            cpf,
            income,
            birth_date,
            children,
        }
    }

    /// Validates raw values and builds a [`NewClient`].
    pub fn try_new(
        name: impl Into<String>,
        cpf: Option<String>,
        income: f64,
        birth_date: DateTime<Utc>,
        children: i32,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self::new(
            ClientName::new(name)?,
            normalize_cpf(cpf)?,
            Income::new(income)?,
            birth_date,
            ChildrenCount::new(children)?,
        ))
    }
}

/// Full replacement of every mutable field of a [`Client`].
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UpdateClient {
    pub name: ClientName,
    pub cpf: Option<Cpf>,
    pub income: Income,
    pub birth_date: DateTime<Utc>,
    pub children: ChildrenCount,
}

impl UpdateClient {
    #[must_use]
    pub fn new(
        name: ClientName,
        cpf: Option<Cpf>,
        income: Income,
        birth_date: DateTime<Utc>,
        children: ChildrenCount,
    ) -> Self {
        Self {
            name,
            cpf,
            income,
            birth_date,
            children,
        }
    }

    /// Validates raw values and builds an [`UpdateClient`].
    pub fn try_new(
        name: impl Into<String>,
        cpf: Option<String>,
        income: f64,
        birth_date: DateTime<Utc>,
        children: i32,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self::new(
            ClientName::new(name)?,
            normalize_cpf(cpf)?,
            Income::new(income)?,
            birth_date,
            ChildrenCount::new(children)?,
        ))
    }
}

/// Blank CPF strings are treated as "no CPF".
fn normalize_cpf(cpf: Option<String>) -> Result<Option<Cpf>, TypeConstraintError> {
    cpf.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(Cpf::new)
        .transpose()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn birth_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn try_new_treats_blank_cpf_as_missing() {
        let client = NewClient::try_new("Fulano", Some("   ".into()), 5000.0, birth_date(), 0)
            .expect("valid client");
        assert_eq!(client.cpf, None);
        assert_eq!(client.name.as_str(), "Fulano");
    }

    #[test]
    fn try_new_rejects_negative_income() {
        let err = NewClient::try_new("Fulano", None, -1.0, birth_date(), 0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NegativeIncome);
    }
}
