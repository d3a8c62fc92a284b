// src/db/credit_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::credit::{CreditRequest, CreditRequestStatus},
};

#[derive(Clone)]
pub struct CreditRequestRepository {
    pool: PgPool,
}

impl CreditRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CreditRequest>, AppError> {
        let request =
            sqlx::query_as::<_, CreditRequest>("SELECT * FROM credit_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(request)
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        valor: Decimal,
        prazo_meses: i32,
        finalidade: &str,
        documentos: &[String],
    ) -> Result<CreditRequest, AppError> {
        let request = sqlx::query_as::<_, CreditRequest>(
            r#"
            INSERT INTO credit_requests (company_id, valor, prazo_meses, finalidade, documentos)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(valor)
        .bind(prazo_meses)
        .bind(finalidade)
        .bind(documentos)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    // Solicitações das empresas de um empreendedor.
    pub async fn list_by_owner(&self, empreendedor_id: Uuid) -> Result<Vec<CreditRequest>, AppError> {
        let requests = sqlx::query_as::<_, CreditRequest>(
            r#"
            SELECT cr.*
            FROM credit_requests cr
            JOIN companies c ON c.id = cr.company_id
            WHERE c.empreendedor_id = $1
            ORDER BY cr.created_at DESC
            "#,
        )
        .bind(empreendedor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn list_all(&self) -> Result<Vec<CreditRequest>, AppError> {
        let requests = sqlx::query_as::<_, CreditRequest>(
            "SELECT * FROM credit_requests ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    // Quando há transição, `expected_status` entra no WHERE: a segunda de
    // duas decisões concorrentes não casa linha alguma e devolvemos None.
    pub async fn admin_update(
        &self,
        id: Uuid,
        expected_status: Option<CreditRequestStatus>,
        status: Option<CreditRequestStatus>,
        observacoes_analise: Option<&str>,
        motivo_reprovacao: Option<&str>,
    ) -> Result<Option<CreditRequest>, AppError> {
        let request = sqlx::query_as::<_, CreditRequest>(
            r#"
            UPDATE credit_requests
            SET status              = COALESCE($2, status),
                observacoes_analise = COALESCE($3, observacoes_analise),
                motivo_reprovacao   = COALESCE($4, motivo_reprovacao),
                updated_at = now()
            WHERE id = $1 AND ($5::credit_request_status IS NULL OR status = $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(observacoes_analise)
        .bind(motivo_reprovacao)
        .bind(expected_status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }
}
