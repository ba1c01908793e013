//! In-test stores backed by a mutex-guarded vector.

use std::sync::Mutex;

use async_trait::async_trait;

use pvz_core::{DomainError, DomainResult, ReceptionId};

use crate::{Product, ProductStore, Reception, ReceptionFilter, ReceptionStore, SortOrder};

#[derive(Default)]
pub struct FakeReceptions {
    rows: Mutex<Vec<Reception>>,
}

impl FakeReceptions {
    pub fn get(&self, id: ReceptionId) -> Option<Reception> {
        self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ReceptionStore for FakeReceptions {
    async fn add(&self, reception: &Reception) -> DomainResult<()> {
        self.rows.lock().unwrap().push(reception.clone());
        Ok(())
    }

    async fn update(&self, reception: &Reception) -> DomainResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|r| r.id == reception.id)
            .ok_or(DomainError::ReceptionDoesNotExist)?;
        *slot = reception.clone();
        Ok(())
    }

    async fn find_all(&self, filter: &ReceptionFilter) -> DomainResult<Vec<Reception>> {
        let mut found: Vec<Reception> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.pvz_id == filter.pvz_id && r.status == filter.status)
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.created_at, r.id));
        if filter.order == SortOrder::Descending {
            found.reverse();
        }
        found.truncate(filter.limit);
        Ok(found)
    }
}

#[derive(Default)]
pub struct FakeProducts {
    rows: Mutex<Vec<Product>>,
}

impl FakeProducts {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ProductStore for FakeProducts {
    async fn add(&self, product: &Product) -> DomainResult<()> {
        self.rows.lock().unwrap().push(product.clone());
        Ok(())
    }

    async fn remove(&self, product: &Product) -> DomainResult<()> {
        self.rows.lock().unwrap().retain(|p| p.id != product.id);
        Ok(())
    }

    async fn find_all_by_reception(&self, reception_id: ReceptionId) -> DomainResult<Vec<Product>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.reception_id == reception_id)
            .cloned()
            .collect())
    }
}
