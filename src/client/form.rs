use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::{format_date, Investment, InvestmentId, InvestmentPayload};

/// Which request a submit turns into.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Add,
    Edit(InvestmentId),
}

impl Mode {
    pub fn editing(&self) -> Option<&InvestmentId> {
        match self {
            Mode::Add => None,
            Mode::Edit(id) => Some(id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Kind,
    Value,
    Date,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Kind, Field::Value, Field::Date];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Kind => "Type",
            Field::Value => "Value",
            Field::Date => "Date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = String;

    /// Accepts the English names and the API's field names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" | "nome" => Ok(Field::Name),
            "kind" | "type" | "tipo" => Ok(Field::Kind),
            "value" | "valor" => Ok(Field::Value),
            "date" | "data" | "data_investimento" => Ok(Field::Date),
            other => Err(format!(
                "unknown field '{other}', expected name, kind, value or date"
            )),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(Field),

    #[error("value '{0}' is not a number")]
    InvalidValue(String),
}

/// Raw text of the four editable inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub kind: String,
    pub value: String,
    pub date: String,
}

impl FormFields {
    pub fn from_investment(inv: &Investment) -> Self {
        Self {
            name: inv.name.clone(),
            kind: inv.kind.clone(),
            value: inv.value.to_string(),
            date: format_date(&inv.date).to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Kind => &self.kind,
            Field::Value => &self.value,
            Field::Date => &self.date,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Kind => self.kind = value,
            Field::Value => self.value = value,
            Field::Date => self.date = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Every field must be filled in and the value must parse as a finite
    /// number; a decimal comma is accepted.
    pub fn to_payload(&self) -> Result<InvestmentPayload, FormError> {
        for field in Field::ALL {
            if self.get(field).trim().is_empty() {
                return Err(FormError::Missing(field));
            }
        }
        let raw = self.value.trim();
        let value = raw
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| FormError::InvalidValue(raw.to_string()))?;
        Ok(InvestmentPayload {
            name: self.name.trim().to_string(),
            kind: self.kind.trim().to_string(),
            value,
            date: self.date.trim().to_string(),
        })
    }
}

/// Form state shared between the controller and its view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub mode: Mode,
    pub fields: FormFields,
    pub in_flight: bool,
}

impl FormState {
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            Mode::Add => "Save",
            Mode::Edit(_) => "Update",
        }
    }

    pub fn cancel_visible(&self) -> bool {
        matches!(self.mode, Mode::Edit(_))
    }

    pub fn first_field(&self) -> Field {
        Field::Name
    }

    pub(crate) fn load(&mut self, inv: &Investment) {
        self.mode = Mode::Edit(inv.id.clone());
        self.fields = FormFields::from_investment(inv);
    }

    pub(crate) fn reset(&mut self) {
        self.mode = Mode::Add;
        self.fields = FormFields::default();
    }
}
