use uuid::Uuid;

use jobli_core::employer::{CreateEmployerRequest, Employer, ENTITY_TYPE_EMPLOYER};
use jobli_core::record::{keys, SingleTableRecord};
use jobli_core::storage::{RepositoryError, Result, ScanFilter, TableBackend};

use super::decode_all;
use crate::store::SingleTableStore;

/// Employer accounts, one row per employer in the employers table.
pub struct EmployerRepository<B> {
    store: SingleTableStore<B>,
}

impl<B: TableBackend> EmployerRepository<B> {
    pub fn new(store: SingleTableStore<B>) -> Self {
        Self { store }
    }

    /// Registers an employer under a fresh id.
    pub async fn create(&self, request: CreateEmployerRequest, actor: &str) -> Result<Employer> {
        let employer = request.into_employer()?;

        tracing::info!(employer_id = %employer.id, "Creating employer");
        let item = self.store.create(&employer, actor).await?;
        Employer::from_attributes(&item)
    }

    pub async fn find(&self, employer_id: Uuid) -> Result<Option<Employer>> {
        self.store
            .get(&keys::employer_pk(employer_id), keys::DELIMITER)
            .await?
            .map(|item| Employer::from_attributes(&item))
            .transpose()
    }

    pub async fn get(&self, employer_id: Uuid) -> Result<Employer> {
        self.find(employer_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY_TYPE_EMPLOYER, employer_id.to_string()))
    }

    pub async fn update(&self, employer: &Employer, actor: &str) -> Result<Employer> {
        let item = self.store.update(employer, actor).await?;
        Employer::from_attributes(&item)
    }

    /// Every employer.
    pub async fn list(&self) -> Result<Vec<Employer>> {
        let items = self.store.scan_by_prefix(keys::EMPLOYER_PREFIX).await?;
        decode_all(items)
    }

    /// Employers whose business name matches exactly.
    pub async fn find_by_business_name(&self, business_name: &str) -> Result<Vec<Employer>> {
        self.search(Some(business_name), None).await
    }

    /// Employers whose business address is in `city`.
    pub async fn find_by_city(&self, city: &str) -> Result<Vec<Employer>> {
        self.search(None, Some(city)).await
    }

    /// Employers matching every given criterion exactly. With no criteria
    /// this is [`list`](Self::list).
    pub async fn search(
        &self,
        business_name: Option<&str>,
        city: Option<&str>,
    ) -> Result<Vec<Employer>> {
        let mut filters = vec![ScanFilter::begins_with(
            self.store.schema().partition_key.clone(),
            keys::EMPLOYER_PREFIX,
        )];
        if let Some(name) = business_name {
            filters.push(ScanFilter::equals("business_name", name));
        }
        if let Some(city) = city {
            filters.push(ScanFilter::equals("business_address.city", city));
        }
        let items = self.store.scan_by_filter(ScanFilter::and(filters)).await?;
        decode_all(items)
    }
}
