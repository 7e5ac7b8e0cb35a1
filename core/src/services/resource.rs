//! CRUD over one collection, composed from `RestClient`.

use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::clear_on_unauthorized;
use crate::client::RestClient;
use crate::coerce::NumericFields;
use crate::error::ApiError;
use crate::session::SessionContext;

/// A collection such as `students` under a role base path. `T` is the
/// record type, `I` the partial input used for create and update.
pub struct Resource<T, I> {
    api: RestClient,
    collection: &'static str,
    session: Arc<SessionContext>,
    _records: PhantomData<fn() -> (T, I)>,
}

impl<T, I> fmt::Debug for Resource<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("base_url", &self.api.base_url())
            .field("collection", &self.collection)
            .finish()
    }
}

impl<T, I> Resource<T, I>
where
    T: DeserializeOwned + NumericFields,
    I: Serialize,
{
    pub fn new(api: RestClient, collection: &'static str, session: Arc<SessionContext>) -> Self {
        Self {
            api,
            collection,
            session,
            _records: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    fn member(&self, id: impl Display) -> String {
        format!("{}/{id}", self.collection)
    }

    pub async fn list(&self) -> Result<Vec<T>, ApiError> {
        clear_on_unauthorized(&self.session, self.api.list_normalized(self.collection).await).await
    }

    pub async fn get(&self, id: impl Display) -> Result<T, ApiError> {
        let path = self.member(id);
        clear_on_unauthorized(&self.session, self.api.get_one_normalized(&path).await).await
    }

    pub async fn create(&self, input: &I) -> Result<T, ApiError> {
        clear_on_unauthorized(
            &self.session,
            self.api.create_normalized(self.collection, input).await,
        )
        .await
    }

    pub async fn update(&self, id: impl Display, input: &I) -> Result<T, ApiError> {
        let path = self.member(id);
        clear_on_unauthorized(&self.session, self.api.update_normalized(&path, input).await).await
    }

    pub async fn delete(&self, id: impl Display) -> Result<(), ApiError> {
        let path = self.member(id);
        clear_on_unauthorized(&self.session, self.api.delete(&path).await).await
    }
}
