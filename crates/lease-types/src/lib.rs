//! Shared domain types for the Gestloc contract pipeline.
//!
//! These are read-only snapshots of records owned by the storage layer;
//! the renderer and exporter consume them and never write them back.

use chrono::NaiveDate;
use uuid::Uuid;

/// Landlord identity and banking details. At most one per owning user.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LandlordProfile {
    pub full_name: String,
    pub nationality: String,
    pub passport_number: Option<String>,
    pub address: String,
    pub bank_name: String,
    pub bank_account: Option<String>,
}

/// Tenant identity as captured on the lease.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TenantSnapshot {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl TenantSnapshot {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The rented unit.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PropertySnapshot {
    pub unit_number: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
}

/// One lease, with its unit folded in.
///
/// `deposit_amount` is optional in storage; [`LeaseSnapshot::resolved_deposit`]
/// is the single place the 3x-rent default is applied.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LeaseSnapshot {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_amount: f64,
    pub deposit_amount: Option<f64>,
    pub property: PropertySnapshot,
}

impl LeaseSnapshot {
    /// Deposit figure used everywhere: the stored amount, or 3x rent when absent.
    pub fn resolved_deposit(&self) -> f64 {
        self.deposit_amount.unwrap_or(self.rent_amount * 3.0)
    }
}

/// One contract clause or annex, as authored.
///
/// `content` is raw text that may contain `{{placeholder}}` tokens. Clauses
/// are ordered ascending by `order_index` within each partition
/// (`is_annex = false` for main articles, `true` for annexes); ties keep
/// fetch order.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClauseRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub article_number: Option<u32>,
    pub is_annex: bool,
    pub order_index: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lease(rent: f64, deposit: Option<f64>) -> LeaseSnapshot {
        LeaseSnapshot {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            rent_amount: rent,
            deposit_amount: deposit,
            property: PropertySnapshot {
                unit_number: "A3".to_string(),
                bedrooms: 2,
                bathrooms: 1,
            },
        }
    }

    #[test]
    fn deposit_defaults_to_three_times_rent() {
        assert_eq!(lease(700.0, None).resolved_deposit(), 2100.0);
    }

    #[test]
    fn explicit_deposit_wins_over_default() {
        assert_eq!(lease(700.0, Some(1500.0)).resolved_deposit(), 1500.0);
    }

    #[test]
    fn tenant_full_name_joins_first_and_last() {
        let tenant = TenantSnapshot {
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            email: None,
            phone: None,
        };
        assert_eq!(tenant.full_name(), "Jean Dupont");
    }

    #[test]
    fn clause_record_roundtrips_through_json() {
        let clause = ClauseRecord {
            id: Uuid::new_v4(),
            title: "Loyer".to_string(),
            content: "Le loyer mensuel est de {{rent_amount}} euros.".to_string(),
            article_number: Some(3),
            is_annex: false,
            order_index: 3,
        };

        let json = serde_json::to_string(&clause).unwrap();
        let parsed: ClauseRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, clause.id);
        assert_eq!(parsed.title, clause.title);
        assert_eq!(parsed.article_number, Some(3));
        assert!(!parsed.is_annex);
    }
}
