//! Calculator form submission handling.
//!
//! Browser forms post every field as text. [`TaxForm`] holds the raw
//! values and turns them into a core [`TaxQuery`], reporting problems with
//! the same messages the page shows to the user.

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{GamblingTaxEngine, InvalidInput, TaxQuery, TaxResult};
use thiserror::Error;

use crate::utils::parse_optional_decimal;

/// Which pair of fields the user filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMethod {
    #[default]
    WinningsLosses,
    ProfitRoi,
}

impl InputMethod {
    pub fn all() -> &'static [InputMethod] {
        &[InputMethod::WinningsLosses, InputMethod::ProfitRoi]
    }

    /// Value submitted by the form's method select.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMethod::WinningsLosses => "basic",
            InputMethod::ProfitRoi => "roi",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "basic" => Some(InputMethod::WinningsLosses),
            "roi" => Some(InputMethod::ProfitRoi),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputMethod::WinningsLosses => "Winnings & Losses",
            InputMethod::ProfitRoi => "Profit & ROI",
        }
    }
}

/// Problems with a submitted form, including rejections from the core.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Year is required.")]
    MissingYear,

    #[error("Invalid tax year '{0}'.")]
    InvalidYear(String),

    #[error("Please enter both winnings and losses.")]
    MissingWinningsLosses,

    #[error("Please enter both profit and ROI.")]
    MissingProfitRoi,

    #[error("Invalid method selected.")]
    InvalidMethod,

    #[error("Invalid number '{value}' for {field}.")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Negative {0} are not allowed.")]
    NegativeAmount(&'static str),

    #[error("{0}")]
    Calculation(#[from] InvalidInput),
}

/// Raw calculator form fields as posted by the browser.
///
/// `roi` is a percentage as typed by the user (e.g. `-5` for -5%).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxForm {
    pub year: Option<String>,
    pub method: Option<String>,
    pub winnings: Option<String>,
    pub losses: Option<String>,
    pub profit: Option<String>,
    pub roi: Option<String>,
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn parse_amount(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<Decimal>, FormError> {
    parse_optional_decimal(value).map_err(|e| FormError::InvalidNumber {
        field,
        value: e.input().to_string(),
    })
}

/// Parses two fields that must be supplied together.
///
/// Blank fields are reported as `missing` before any number is parsed.
fn parse_pair(
    fields: [(&'static str, Option<&str>); 2],
    missing: FormError,
) -> Result<(Decimal, Decimal), FormError> {
    if fields.iter().any(|(_, value)| is_blank(*value)) {
        return Err(missing);
    }

    let [(first_name, first), (second_name, second)] = fields;
    match (parse_amount(first_name, first)?, parse_amount(second_name, second)?) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(missing),
    }
}

impl TaxForm {
    fn tax_year(&self) -> Result<i32, FormError> {
        let raw = self.year.as_deref().map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(FormError::MissingYear);
        }
        raw.parse()
            .map_err(|_| FormError::InvalidYear(raw.to_string()))
    }

    fn method(&self) -> Result<InputMethod, FormError> {
        self.method
            .as_deref()
            .and_then(InputMethod::parse)
            .ok_or(FormError::InvalidMethod)
    }

    /// Builds the core query, converting the ROI percentage to a ratio.
    pub fn to_query(&self) -> Result<TaxQuery, FormError> {
        let tax_year = self.tax_year()?;

        match self.method()? {
            InputMethod::WinningsLosses => {
                let (winnings, losses) = parse_pair(
                    [
                        ("winnings", self.winnings.as_deref()),
                        ("losses", self.losses.as_deref()),
                    ],
                    FormError::MissingWinningsLosses,
                )?;
                let query = TaxQuery::winnings_losses(tax_year, winnings, losses);
                match query.negative_amount() {
                    Some(field) => Err(FormError::NegativeAmount(field)),
                    None => Ok(query),
                }
            }
            InputMethod::ProfitRoi => {
                let (profit, roi_percent) = parse_pair(
                    [
                        ("profit", self.profit.as_deref()),
                        ("ROI", self.roi.as_deref()),
                    ],
                    FormError::MissingProfitRoi,
                )?;
                Ok(TaxQuery::profit_roi(
                    tax_year,
                    profit,
                    roi_percent / Decimal::ONE_HUNDRED,
                ))
            }
        }
    }

    /// Parses the form and runs it through `engine`.
    pub fn calculate(
        &self,
        engine: &GamblingTaxEngine<'_>,
    ) -> Result<TaxResult, FormError> {
        let query = self.to_query()?;
        Ok(engine.calculate(&query)?)
    }
}
