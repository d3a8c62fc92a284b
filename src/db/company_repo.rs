// src/db/company_repo.rs

use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::company::{Company, CompanyStatus},
};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    pub async fn create(
        &self,
        empreendedor_id: Uuid,
        razao_social: &str,
        cnpj: &str,
        endereco: Option<&Value>,
        setor: Option<&str>,
        faturamento_anual: Option<Decimal>,
        descricao: Option<&str>,
        imagens: &[String],
    ) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies
                (empreendedor_id, razao_social, cnpj, endereco, setor,
                 faturamento_anual, descricao, imagens)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(empreendedor_id)
        .bind(razao_social)
        .bind(cnpj)
        .bind(endereco)
        .bind(setor)
        .bind(faturamento_anual)
        .bind(descricao)
        .bind(imagens)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::CnpjAlreadyExists;
                }
            }
            e.into()
        })?;
        Ok(company)
    }

    pub async fn list_by_owner(&self, empreendedor_id: Uuid) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE empreendedor_id = $1 ORDER BY created_at DESC",
        )
        .bind(empreendedor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    // A "rede" vista pelos investidores: só empresas aprovadas.
    pub async fn list_approved(&self) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE status = 'APROVADA' ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    pub async fn list_all(&self) -> Result<Vec<Company>, AppError> {
        let companies =
            sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(companies)
    }

    // Edição "soft" pelo dono: endereço, setor, descrição e imagens.
    pub async fn update_soft_fields(
        &self,
        id: Uuid,
        endereco: Option<&Value>,
        setor: Option<&str>,
        descricao: Option<&str>,
        imagens: Option<&[String]>,
    ) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET endereco  = COALESCE($2, endereco),
                setor     = COALESCE($3, setor),
                descricao = COALESCE($4, descricao),
                imagens   = COALESCE($5, imagens),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(endereco)
        .bind(setor)
        .bind(descricao)
        .bind(imagens)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CompanyNotFound)?;
        Ok(company)
    }

    // Mutação administrativa: status (já validado pela máquina de estados),
    // notas internas, valuation e motivo de reprovação. Quando há transição,
    // `expected_status` entra no WHERE: duas decisões concorrentes não se
    // sobrescrevem — a segunda não casa linha alguma e devolvemos None.
    pub async fn admin_update(
        &self,
        id: Uuid,
        expected_status: Option<CompanyStatus>,
        status: Option<CompanyStatus>,
        observacoes_internas: Option<&str>,
        valuation: Option<Decimal>,
        motivo_reprovacao: Option<&str>,
    ) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET status               = COALESCE($2, status),
                observacoes_internas = COALESCE($3, observacoes_internas),
                valuation            = COALESCE($4, valuation),
                motivo_reprovacao    = COALESCE($5, motivo_reprovacao),
                updated_at = now()
            WHERE id = $1 AND ($6::company_status IS NULL OR status = $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(observacoes_internas)
        .bind(valuation)
        .bind(motivo_reprovacao)
        .bind(expected_status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }
}
