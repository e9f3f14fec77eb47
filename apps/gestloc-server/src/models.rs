use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use lease_types::{ClauseRecord, LandlordProfile, LeaseSnapshot, PropertySnapshot, TenantSnapshot};

/// Row of `landlord_profiles`.
#[derive(Debug, FromRow)]
pub struct LandlordRow {
    pub id: String,
    pub full_name: String,
    pub nationality: String,
    pub passport_number: Option<String>,
    pub address: String,
    pub bank_name: String,
    pub bank_account: Option<String>,
}

impl LandlordRow {
    pub fn into_profile(self) -> LandlordProfile {
        LandlordProfile {
            full_name: self.full_name,
            nationality: self.nationality,
            passport_number: self.passport_number,
            address: self.address,
            bank_name: self.bank_name,
            bank_account: self.bank_account,
        }
    }
}

/// Row of `tenants`.
#[derive(Debug, FromRow)]
pub struct TenantRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl TenantRow {
    pub fn into_snapshot(self) -> TenantSnapshot {
        TenantSnapshot {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
        }
    }
}

/// Row of `leases`, with the unit columns folded in.
#[derive(Debug, FromRow)]
pub struct LeaseRow {
    pub id: String,
    pub tenant_id: String,
    pub unit_number: String,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_amount: f64,
    pub deposit_amount: Option<f64>,
}

impl LeaseRow {
    pub fn into_snapshot(self) -> LeaseSnapshot {
        LeaseSnapshot {
            start_date: self.start_date,
            end_date: self.end_date,
            rent_amount: self.rent_amount,
            deposit_amount: self.deposit_amount,
            property: PropertySnapshot {
                unit_number: self.unit_number,
                bedrooms: self.bedrooms as u32,
                bathrooms: self.bathrooms as u32,
            },
        }
    }
}

/// Row of `clauses`.
#[derive(Debug, FromRow)]
pub struct ClauseRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub article_number: Option<i64>,
    pub is_annex: bool,
    pub order_index: i64,
}

impl ClauseRow {
    pub fn into_record(self) -> Result<ClauseRecord, uuid::Error> {
        Ok(ClauseRecord {
            id: Uuid::parse_str(&self.id)?,
            title: self.title,
            content: self.content,
            article_number: self.article_number.map(|n| n as u32),
            is_annex: self.is_annex,
            order_index: self.order_index as i32,
        })
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
