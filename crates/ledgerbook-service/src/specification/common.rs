//! Existence and uniqueness rules shared by every entity.

use std::sync::Arc;

use async_trait::async_trait;
use ledgerbook_core::Filterable;
use ledgerbook_db::ReadRepository;

use super::Specification;
use crate::error::{ServiceError, ServiceResult};

/// The entity with the candidate id must exist. Throwing style.
pub struct MustExistById<E: Filterable> {
    repository: Arc<dyn ReadRepository<E>>,
    code: &'static str,
}

impl<E: Filterable> MustExistById<E> {
    pub fn new(repository: Arc<dyn ReadRepository<E>>, code: &'static str) -> Self {
        MustExistById { repository, code }
    }
}

#[async_trait]
impl<E: Filterable> Specification<str> for MustExistById<E> {
    async fn is_satisfied_by(&self, id: &str) -> ServiceResult<bool> {
        match self.repository.get_by_id(id).await? {
            Some(_) => Ok(true),
            None => Err(self.violation(id)),
        }
    }

    fn violation(&self, id: &str) -> ServiceError {
        ServiceError::not_found(self.code, E::KIND, id)
    }
}

/// No other record may hold the candidate's value. Throwing style.
///
/// `filter` selects the records sharing the value; a record whose id equals
/// `excluding` (the candidate itself, on update) does not count.
pub struct MustBeUnique<E: Filterable> {
    repository: Arc<dyn ReadRepository<E>>,
    code: &'static str,
    field: &'static str,
    filter: fn(&E) -> E::Filter,
    value: fn(&E) -> String,
    excluding: Option<String>,
}

impl<E: Filterable> MustBeUnique<E> {
    pub fn new(
        repository: Arc<dyn ReadRepository<E>>,
        code: &'static str,
        field: &'static str,
        filter: fn(&E) -> E::Filter,
        value: fn(&E) -> String,
    ) -> Self {
        MustBeUnique {
            repository,
            code,
            field,
            filter,
            value,
            excluding: None,
        }
    }

    /// Ignores the record with this id.
    pub fn excluding(mut self, id: impl Into<String>) -> Self {
        self.excluding = Some(id.into());
        self
    }
}

#[async_trait]
impl<E: Filterable> Specification<E> for MustBeUnique<E> {
    async fn is_satisfied_by(&self, candidate: &E) -> ServiceResult<bool> {
        let holders = self.repository.find(&(self.filter)(candidate)).await?;

        let conflict = holders
            .iter()
            .find(|holder| Some(holder.id()) != self.excluding.as_deref());

        match conflict {
            None => Ok(true),
            Some(holder) => Err(ServiceError::already_exists(
                self.code,
                E::KIND,
                self.field,
                (self.value)(candidate),
                Some(holder.id().to_string()),
            )),
        }
    }

    fn violation(&self, candidate: &E) -> ServiceError {
        ServiceError::already_exists(self.code, E::KIND, self.field, (self.value)(candidate), None)
    }
}
