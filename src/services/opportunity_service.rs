use crate::dto::opportunity_dto::{OpportunityListQuery, RegisteredOrder};
use crate::error::{Error, Result};
use crate::models::opportunity::Opportunity;
use crate::validation::ValidOpportunity;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, company_name, company_address, company_email, company_website, \
    company_mobile_phone, company_landline_phone, job_title, job_description, reference_site, \
    interview_datetime, status, registered_at, updated_at";

#[derive(Clone)]
pub struct OpportunityService {
    pool: PgPool,
}

pub struct OpportunityList {
    pub items: Vec<Opportunity>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl OpportunityService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, record: ValidOpportunity) -> Result<Opportunity> {
        let query = format!(
            r#"
            INSERT INTO opportunities (
                company_name, company_address, company_email, company_website,
                company_mobile_phone, company_landline_phone, job_title, job_description,
                reference_site, interview_datetime, status
            ) VALUES (
                $1,$2,$3,$4,
                $5,$6,$7,$8,
                $9,$10,$11
            )
            RETURNING {COLUMNS}
            "#
        );

        let opportunity = sqlx::query_as::<_, Opportunity>(&query)
            .bind(&record.company_name)
            .bind(&record.company_address)
            .bind(&record.company_email)
            .bind(&record.company_website)
            .bind(&record.company_mobile_phone)
            .bind(&record.company_landline_phone)
            .bind(&record.job_title)
            .bind(&record.job_description)
            .bind(&record.reference_site)
            .bind(record.interview_datetime.map(|dt| dt.with_timezone(&Utc)))
            .bind(record.status.as_str())
            .fetch_one(&self.pool)
            .await?;

        tracing::info!(id = %opportunity.id, status = %opportunity.status, "Opportunity registered");
        Ok(opportunity)
    }

    /// Replaces every editable column. `registered_at` is never touched.
    pub async fn update(&self, id: Uuid, record: ValidOpportunity) -> Result<Opportunity> {
        let query = format!(
            r#"
            UPDATE opportunities
            SET
                company_name = $2,
                company_address = $3,
                company_email = $4,
                company_website = $5,
                company_mobile_phone = $6,
                company_landline_phone = $7,
                job_title = $8,
                job_description = $9,
                reference_site = $10,
                interview_datetime = $11,
                status = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let opportunity = sqlx::query_as::<_, Opportunity>(&query)
            .bind(id)
            .bind(&record.company_name)
            .bind(&record.company_address)
            .bind(&record.company_email)
            .bind(&record.company_website)
            .bind(&record.company_mobile_phone)
            .bind(&record.company_landline_phone)
            .bind(&record.job_title)
            .bind(&record.job_description)
            .bind(&record.reference_site)
            .bind(record.interview_datetime.map(|dt| dt.with_timezone(&Utc)))
            .bind(record.status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(id = %opportunity.id, status = %opportunity.status, "Opportunity updated");
        Ok(opportunity)
    }

    pub async fn list(&self, query: OpportunityListQuery) -> Result<OpportunityList> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| Error::BadRequest(format!("page {} is out of range", page)))?;
        let status = query.status_filter();
        let direction = match query.order.unwrap_or_default() {
            RegisteredOrder::Newest => "DESC",
            RegisteredOrder::Oldest => "ASC",
        };

        tracing::debug!(?status, direction, page, per_page, "Listing opportunities");

        let where_clause = if status.is_some() {
            "WHERE status = $1"
        } else {
            ""
        };
        let next = if status.is_some() { 2 } else { 1 };

        let items_query = format!(
            "SELECT {COLUMNS}
             FROM opportunities
             {where_clause}
             ORDER BY registered_at {direction}, id {direction}
             LIMIT ${} OFFSET ${}",
            next,
            next + 1
        );
        let total_query = format!("SELECT COUNT(*) FROM opportunities {where_clause}");

        let mut items_statement = sqlx::query_as::<_, Opportunity>(&items_query);
        let mut total_statement = sqlx::query_scalar::<_, i64>(&total_query);
        if let Some(status) = status {
            items_statement = items_statement.bind(status.as_str());
            total_statement = total_statement.bind(status.as_str());
        }
        let items = items_statement
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        let total = total_statement.fetch_one(&self.pool).await?;

        let total_pages = (total + per_page - 1) / per_page;

        Ok(OpportunityList {
            items,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Opportunity> {
        let query = format!("SELECT {COLUMNS} FROM opportunities WHERE id = $1");
        sqlx::query_as::<_, Opportunity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM opportunities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Err(not_found(id));
        }

        tracing::info!(%id, "Opportunity removed");
        Ok(())
    }
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Opportunity {} not found", id))
}
