use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Asset, AssetInput, Client, ClientInput};
use crate::ports::{AssetRegistry, ClientRegistry};

/// Client and catalog registration: validation, uniqueness among active
/// records, soft deletes.
#[derive(Clone)]
pub struct RegistryService {
    clients: Arc<dyn ClientRegistry>,
    assets: Arc<dyn AssetRegistry>,
}

impl RegistryService {
    pub fn new(clients: Arc<dyn ClientRegistry>, assets: Arc<dyn AssetRegistry>) -> Self {
        Self { clients, assets }
    }

    pub fn with_backend<B>(backend: Arc<B>) -> Self
    where
        B: ClientRegistry + AssetRegistry + 'static,
    {
        Self::new(backend.clone(), backend)
    }

    // -----------------------------------------------------------------------
    // Clients
    // -----------------------------------------------------------------------

    pub async fn create_client(&self, input: ClientInput) -> Result<Client, AppError> {
        let input = self.checked_client(input, None).await?;
        let client = self.clients.create_client(&input).await?;

        tracing::info!(client_id = %client.id, risk_profile = %client.risk_profile, "Client registered");
        Ok(client)
    }

    pub async fn update_client(&self, id: Uuid, input: ClientInput) -> Result<Client, AppError> {
        let input = self.checked_client(input, Some(id)).await?;
        let client = self
            .clients
            .update_client(id, &input)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("client {id}")))?;

        tracing::info!(client_id = %id, "Client updated");
        Ok(client)
    }

    pub async fn delete_client(&self, id: Uuid) -> Result<(), AppError> {
        if !self.clients.deactivate_client(id).await? {
            return Err(AppError::NotFound(format!("client {id}")));
        }
        tracing::info!(client_id = %id, "Client deactivated");
        Ok(())
    }

    async fn checked_client(&self, input: ClientInput, exclude: Option<Uuid>) -> Result<ClientInput, AppError> {
        let input = input.normalized();
        input
            .validate(Utc::now().date_naive())
            .map_err(AppError::InvalidArgument)?;

        if let Some(conflict) = self
            .clients
            .find_conflict(&input.tax_id, &input.email, exclude)
            .await?
        {
            return Err(AppError::InvalidArgument(format!(
                "{} already registered to another client",
                conflict.field()
            )));
        }

        Ok(input)
    }

    // -----------------------------------------------------------------------
    // Assets
    // -----------------------------------------------------------------------

    pub async fn create_asset(&self, input: AssetInput) -> Result<Asset, AppError> {
        let input = self.checked_asset(input, None).await?;
        let asset = self.assets.create_asset(&input).await?;

        tracing::info!(asset_id = %asset.id, code = %asset.code, "Asset added to catalog");
        Ok(asset)
    }

    pub async fn update_asset(&self, id: Uuid, input: AssetInput) -> Result<Asset, AppError> {
        let input = self.checked_asset(input, Some(id)).await?;
        let asset = self
            .assets
            .update_asset(id, &input)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("asset {id}")))?;

        tracing::info!(asset_id = %id, code = %asset.code, "Asset updated");
        Ok(asset)
    }

    pub async fn delete_asset(&self, id: Uuid) -> Result<(), AppError> {
        if !self.assets.deactivate_asset(id).await? {
            return Err(AppError::NotFound(format!("asset {id}")));
        }
        tracing::info!(asset_id = %id, "Asset removed from catalog");
        Ok(())
    }

    async fn checked_asset(&self, input: AssetInput, exclude: Option<Uuid>) -> Result<AssetInput, AppError> {
        let input = input.normalized();
        input.validate().map_err(AppError::InvalidArgument)?;

        if self.assets.code_in_use(&input.code, exclude).await? {
            return Err(AppError::InvalidArgument(format!(
                "asset code {} already exists",
                input.code
            )));
        }

        Ok(input)
    }
}
