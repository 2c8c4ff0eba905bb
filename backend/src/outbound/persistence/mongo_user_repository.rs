//! Document store adapter for the [`UserRepository`] port.
//!
//! Documents keep the `_id`, `createdAt`, and `updatedAt` field names that
//! existing collections use. Timestamps are stored as BSON dates, so they are
//! truncated to millisecond precision before a record is returned.
//!
//! Updates are a single `findOneAndUpdate` with `$set` over the changed
//! fields, so concurrent updates to different fields do not overwrite each
//! other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mockable::{Clock, DefaultClock};
use mongodb::Collection;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::mongo::MongoHandle;
use super::mongo_error_mapping::map_mongo_error;
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Address, AddressInput, EmailAddress, GeoInput, GeoPoint, User, UserChanges, UserDetails,
    UserId, UserInput, validate_user_input,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct GeoDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lng: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AddressDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zipcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    geo: Option<GeoDocument>,
}

/// Stored shape of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
    phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<AddressDocument>,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    updated_at: bson::DateTime,
}

impl From<&GeoPoint> for GeoDocument {
    fn from(geo: &GeoPoint) -> Self {
        Self {
            lat: geo.lat.clone(),
            lng: geo.lng.clone(),
        }
    }
}

impl From<&Address> for AddressDocument {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            city: address.city.clone(),
            zipcode: address.zipcode.clone(),
            geo: address.geo.as_ref().map(GeoDocument::from),
        }
    }
}

impl From<AddressDocument> for AddressInput {
    fn from(address: AddressDocument) -> Self {
        Self {
            street: address.street,
            city: address.city,
            zipcode: address.zipcode,
            geo: address.geo.map(|geo| GeoInput {
                lat: geo.lat,
                lng: geo.lng,
            }),
        }
    }
}

fn to_bson_date(timestamp: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(timestamp.timestamp_millis())
}

fn from_bson_date(timestamp: bson::DateTime) -> Result<DateTime<Utc>, UserPersistenceError> {
    DateTime::<Utc>::from_timestamp_millis(timestamp.timestamp_millis()).ok_or_else(|| {
        UserPersistenceError::query(format!("stored timestamp {timestamp} out of range"))
    })
}

fn object_id(id: &UserId) -> Result<ObjectId, UserPersistenceError> {
    ObjectId::parse_str(id.as_ref())
        .map_err(|err| UserPersistenceError::query(format!("invalid object id {id}: {err}")))
}

impl UserDocument {
    fn new(
        id: ObjectId,
        details: &UserDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: details.name().to_owned(),
            email: details.email().as_ref().to_owned(),
            phone: details.phone().to_owned(),
            company: details.company().map(str::to_owned),
            address: details.address().map(AddressDocument::from),
            created_at: to_bson_date(created_at),
            updated_at: to_bson_date(updated_at),
        }
    }

    fn into_user(self) -> Result<User, UserPersistenceError> {
        let id = UserId::new(self.id.to_hex())
            .map_err(|err| UserPersistenceError::query(format!("stored id rejected: {err}")))?;
        let details = validate_user_input(UserInput {
            name: Some(self.name),
            email: Some(self.email),
            phone: Some(self.phone),
            company: self.company,
            address: self.address.map(AddressInput::from),
        })
        .map_err(|errors| {
            UserPersistenceError::query(format!("stored user {id} is invalid: {errors}"))
        })?;
        Ok(User::new(
            id,
            details,
            from_bson_date(self.created_at)?,
            from_bson_date(self.updated_at)?,
        ))
    }
}

/// Build a `$set`/`$unset` update touching only the changed fields.
fn change_document(
    changes: &UserChanges,
    now: DateTime<Utc>,
) -> Result<bson::Document, UserPersistenceError> {
    let mut set = doc! { "updatedAt": to_bson_date(now) };
    let mut unset = bson::Document::new();
    if let Some(name) = changes.name() {
        set.insert("name", name);
    }
    if let Some(email) = changes.email() {
        set.insert("email", email.as_ref());
    }
    if let Some(phone) = changes.phone() {
        set.insert("phone", phone);
    }
    match changes.company() {
        Some(Some(company)) => {
            set.insert("company", company);
        }
        Some(None) => {
            unset.insert("company", "");
        }
        None => {}
    }
    if let Some(address) = changes.address() {
        let encoded = bson::to_bson(&AddressDocument::from(address))
            .map_err(|err| UserPersistenceError::query(format!("address not encodable: {err}")))?;
        set.insert("address", encoded);
    }

    let mut update = doc! { "$set": set };
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    Ok(update)
}

/// [`UserRepository`] backed by a document store collection.
#[derive(Clone)]
pub struct MongoUserRepository {
    users: Collection<UserDocument>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl MongoUserRepository {
    /// Create a repository over the handle's user collection.
    pub fn new(handle: &MongoHandle) -> Self {
        Self::with_clock(handle, Arc::new(DefaultClock))
    }

    /// Create a repository stamped by `clock`.
    pub fn with_clock(handle: &MongoHandle, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            users: handle.users(),
            clock,
        }
    }

    async fn find_one(
        &self,
        filter: bson::Document,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.users
            .find_one(filter, None)
            .await
            .map_err(map_mongo_error)?
            .map(UserDocument::into_user)
            .transpose()
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, details: &UserDetails) -> Result<User, UserPersistenceError> {
        let now = self.clock.utc();
        let document = UserDocument::new(ObjectId::new(), details, now, now);
        self.users
            .insert_one(&document, None)
            .await
            .map_err(map_mongo_error)?;
        document.into_user()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.find_one(doc! { "_id": object_id(id)? }).await
    }

    async fn find_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let documents: Vec<UserDocument> = self
            .users
            .find(doc! {}, None)
            .await
            .map_err(map_mongo_error)?
            .try_collect()
            .await
            .map_err(map_mongo_error)?;
        documents.into_iter().map(UserDocument::into_user).collect()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.find_one(doc! { "email": email.as_ref() }).await
    }

    async fn update(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let update = change_document(changes, self.clock.utc())?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.users
            .find_one_and_update(doc! { "_id": object_id(id)? }, update, options)
            .await
            .map_err(map_mongo_error)?
            .ok_or_else(|| UserPersistenceError::missing(id.to_string()))?
            .into_user()
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.users
            .find_one_and_delete(doc! { "_id": object_id(id)? }, None)
            .await
            .map_err(map_mongo_error)?
            .map(UserDocument::into_user)
            .transpose()
    }
}
