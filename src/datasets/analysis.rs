//! Derived tables behind the retail charts.

use crate::datasets::error::DatasetError;
use crate::datasets::profiler::is_numeric;
use log::{error, info, warn};
use polars::prelude::*;
use std::collections::HashSet;
use std::fmt;

pub const ITEM_IDS: &str = "item_ids";
pub const USER_ID: &str = "user_id";
pub const TOTAL_AMOUNT: &str = "total_amount";
pub const CREATED_AT: &str = "created_at";
pub const ABANDON_DATE: &str = "abandon_date";
pub const ABANDONED_CARTS: &str = "abandoned_carts";
pub const OUTCOME: &str = "outcome";
pub const ORDERED_BEFORE: &str = "ordered_before";
pub const COUNT: &str = "count";

pub(crate) fn require_column<'a>(
    df: &'a DataFrame,
    dataset: &str,
    column: &str,
) -> Result<&'a Column, DatasetError> {
    df.column(column).map_err(|_| DatasetError::MissingColumn {
        dataset: dataset.to_string(),
        column: column.to_string(),
    })
}

fn string_values(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let as_text = column.as_materialized_series().cast(&DataType::String)?;
    Ok(as_text
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Number of items in each row's `item_ids` list. Null lists are skipped.
pub fn item_count_distribution(df: &DataFrame, dataset: &str) -> Result<Vec<u32>, DatasetError> {
    let items = require_column(df, dataset, ITEM_IDS)?;
    let lists = items.as_materialized_series().list()?;
    Ok(lists
        .into_iter()
        .flatten()
        .map(|items| items.len() as u32)
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    NonRegular,
    Regular,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::NonRegular => write!(f, "Non-Regular"),
            UserType::Regular => write!(f, "Regular"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbandonmentRate {
    pub user_type: UserType,
    pub carts: usize,
    pub rate: f64,
}

/// Abandoned carts split by whether their user is a regular, each count divided by
/// the total number of users.
pub fn abandonment_rate_by_user_type(
    abandoned: &DataFrame,
    regulars: &DataFrame,
    users: &DataFrame,
) -> Result<Vec<AbandonmentRate>, DatasetError> {
    let regular_ids: HashSet<String> = string_values(require_column(regulars, "regulars", USER_ID)?)?
        .into_iter()
        .flatten()
        .collect();
    let cart_users = string_values(require_column(abandoned, "abandoned_cart", USER_ID)?)?;

    let total_users = users.height();
    if total_users == 0 {
        return Err(DatasetError::EmptyDataset("users".to_string()));
    }

    let regular_carts = cart_users
        .iter()
        .filter(|id| id.as_ref().is_some_and(|id| regular_ids.contains(id)))
        .count();
    let non_regular_carts = cart_users.len() - regular_carts;

    let rates = vec![
        AbandonmentRate {
            user_type: UserType::NonRegular,
            carts: non_regular_carts,
            rate: non_regular_carts as f64 / total_users as f64,
        },
        AbandonmentRate {
            user_type: UserType::Regular,
            carts: regular_carts,
            rate: regular_carts as f64 / total_users as f64,
        },
    ];
    for r in &rates {
        info!("Abandonment rate for {} users: {:.4}", r.user_type, r.rate);
    }
    Ok(rates)
}

pub fn average_order_total(orders: &DataFrame) -> Result<Option<f64>, DatasetError> {
    let total = require_column(orders, "orders", TOTAL_AMOUNT)?;
    let mean = total
        .as_materialized_series()
        .cast(&DataType::Float64)?
        .f64()?
        .mean();
    if let Some(mean) = mean {
        info!("The average total amount of orders is: {}", mean);
    }
    Ok(mean)
}

/// Abandoned carts per calendar day of `created_at`, oldest first.
///
/// Columns: `abandon_date` (Date) and `abandoned_carts`.
pub fn abandonment_by_date(abandoned: &DataFrame) -> Result<DataFrame, DatasetError> {
    require_column(abandoned, "abandoned_cart", CREATED_AT)?;
    let counts = abandoned
        .clone()
        .lazy()
        .select([col(CREATED_AT).cast(DataType::Date).alias(ABANDON_DATE)])
        .group_by([col(ABANDON_DATE)])
        .agg([len().alias(ABANDONED_CARTS)])
        .sort([ABANDON_DATE], SortMultipleOptions::default())
        .collect()?;
    Ok(counts)
}

/// Replaces the nulls of every numeric column with that column's mean.
///
/// Integer columns with nulls become Float64. Returns the names of the columns that
/// were filled; a column that cannot be filled is logged and left as is.
pub fn fill_numeric_nulls_with_mean(df: &mut DataFrame) -> Vec<String> {
    let targets: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()) && c.null_count() > 0)
        .map(|c| c.name().to_string())
        .collect();

    let mut filled = Vec::with_capacity(targets.len());
    for name in targets {
        let imputed = df
            .column(&name)
            .and_then(|c| c.as_materialized_series().cast(&DataType::Float64))
            .and_then(|s| s.fill_null(FillNullStrategy::Mean));
        let result = imputed.and_then(|s| df.with_column(s).map(|_| ()));
        match result {
            Ok(()) => filled.push(name),
            Err(e) => error!("Error filling missing values in column {}: {}", name, e),
        }
    }
    if filled.is_empty() {
        warn!("No numeric column had missing values to fill");
    }
    filled
}

fn count_by(df: &DataFrame, dataset: &str, keys: &[&str]) -> Result<DataFrame, DatasetError> {
    for key in keys {
        require_column(df, dataset, key)?;
    }
    let counts = df
        .clone()
        .lazy()
        .group_by(keys.iter().map(|k| col(*k)).collect::<Vec<_>>())
        .agg([len().alias(COUNT)])
        .sort(keys.to_vec(), SortMultipleOptions::default())
        .collect()?;
    Ok(counts)
}

/// Rows per `outcome` value, sorted by outcome.
pub fn outcome_counts(df: &DataFrame) -> Result<DataFrame, DatasetError> {
    count_by(df, "feature_frame", &[OUTCOME])
}

/// Rows per (`ordered_before`, `outcome`) pair.
pub fn ordered_before_by_outcome(df: &DataFrame) -> Result<DataFrame, DatasetError> {
    count_by(df, "feature_frame", &[ORDERED_BEFORE, OUTCOME])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn i64_values(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::Int64)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn counts_items_per_order() {
        let items = Series::new(
            ITEM_IDS.into(),
            &[
                Series::new("".into(), &[1i64, 2, 3]),
                Series::new("".into(), &[4i64]),
            ],
        );
        let orders = DataFrame::new(vec![items.into()]).unwrap();

        assert_eq!(item_count_distribution(&orders, "orders").unwrap(), vec![3, 1]);
    }

    #[test]
    fn item_counts_need_item_ids() {
        let orders = df!("id" => &[1i64]).unwrap();
        let err = item_count_distribution(&orders, "orders").unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { ref column, .. } if column == ITEM_IDS
        ));
    }

    #[test]
    fn abandonment_rates_divide_by_all_users() {
        let abandoned = df!(USER_ID => &["u1", "u2", "u3", "u1"]).unwrap();
        let regulars = df!(USER_ID => &["u1", "u9"]).unwrap();
        let users = df!(USER_ID => &["u1", "u2", "u3", "u4", "u5", "u6", "u7", "u8"]).unwrap();

        let rates = abandonment_rate_by_user_type(&abandoned, &regulars, &users).unwrap();

        assert_eq!(
            rates,
            vec![
                AbandonmentRate {
                    user_type: UserType::NonRegular,
                    carts: 2,
                    rate: 0.25,
                },
                AbandonmentRate {
                    user_type: UserType::Regular,
                    carts: 2,
                    rate: 0.25,
                },
            ]
        );
        assert_eq!(rates[0].user_type.to_string(), "Non-Regular");
    }

    #[test]
    fn abandonment_rates_need_users() {
        let abandoned = df!(USER_ID => &["u1"]).unwrap();
        let regulars = df!(USER_ID => &["u1"]).unwrap();
        let users = df!(USER_ID => Vec::<String>::new()).unwrap();

        let err = abandonment_rate_by_user_type(&abandoned, &regulars, &users).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyDataset(_)));
    }

    #[test]
    fn averages_order_totals() {
        let orders = df!(TOTAL_AMOUNT => &[Some(10.0), Some(20.0), None]).unwrap();
        assert_eq!(average_order_total(&orders).unwrap(), Some(15.0));
    }

    #[test]
    fn counts_abandoned_carts_per_day() {
        let created = [
            NaiveDate::from_ymd_opt(2022, 3, 2).unwrap().and_hms_opt(18, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2022, 3, 1).unwrap().and_hms_opt(9, 30, 0).unwrap(),
            NaiveDate::from_ymd_opt(2022, 3, 2).unwrap().and_hms_opt(7, 15, 0).unwrap(),
        ];
        let abandoned = df!(CREATED_AT => created.as_slice()).unwrap();

        let by_date = abandonment_by_date(&abandoned).unwrap();

        let dates: Vec<Option<NaiveDate>> = by_date
            .column(ABANDON_DATE)
            .unwrap()
            .as_materialized_series()
            .date()
            .unwrap()
            .as_date_iter()
            .collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2022, 3, 1),
                NaiveDate::from_ymd_opt(2022, 3, 2),
            ]
        );
        assert_eq!(i64_values(&by_date, ABANDONED_CARTS), vec![Some(1), Some(2)]);
    }

    #[test]
    fn fills_numeric_nulls_only() {
        let mut df = df!(
            "normalised_price" => &[Some(1.0), None, Some(3.0)],
            "people_ex_baby" => &[Some(2i64), None, Some(4)],
            "vendor" => &[Some("a"), None, Some("b")],
            "complete" => &[1.0, 2.0, 3.0],
        )
        .unwrap();

        let filled = fill_numeric_nulls_with_mean(&mut df);

        assert_eq!(filled, vec!["normalised_price", "people_ex_baby"]);
        let price: Vec<Option<f64>> = df
            .column("normalised_price")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(price, vec![Some(1.0), Some(2.0), Some(3.0)]);
        let people: Vec<Option<f64>> = df
            .column("people_ex_baby")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(people, vec![Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(df.column("vendor").unwrap().null_count(), 1);
    }

    #[test]
    fn counts_outcomes_and_prior_orders() {
        let df = df!(
            OUTCOME => &[0.0, 1.0, 0.0, 0.0],
            ORDERED_BEFORE => &[0.0, 1.0, 1.0, 0.0],
        )
        .unwrap();

        let outcomes = outcome_counts(&df).unwrap();
        assert_eq!(outcomes.height(), 2);
        assert_eq!(i64_values(&outcomes, COUNT), vec![Some(3), Some(1)]);

        let pairs = ordered_before_by_outcome(&df).unwrap();
        assert_eq!(pairs.height(), 3);
        assert_eq!(i64_values(&pairs, COUNT), vec![Some(2), Some(1), Some(1)]);
    }
}
