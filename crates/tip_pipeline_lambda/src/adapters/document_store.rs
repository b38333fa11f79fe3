use mongodb::bson::{self, Document};
use mongodb::Client;
use serde_json::{Map, Value};

use super::block_on;

pub trait DocumentStore {
    type Session: DocumentSession;

    fn open_session(&self, connection_string: &str) -> Result<Self::Session, String>;
}

pub trait DocumentSession {
    fn insert_one(
        &mut self,
        database: &str,
        collection: &str,
        document: Map<String, Value>,
    ) -> Result<(), String>;

    fn close(self)
    where
        Self: Sized;
}

/// MongoDB-compatible cluster reached through the official driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct MongoDocumentStore;

pub struct MongoSession {
    client: Client,
}

impl DocumentStore for MongoDocumentStore {
    type Session = MongoSession;

    fn open_session(&self, connection_string: &str) -> Result<MongoSession, String> {
        block_on(Client::with_uri_str(connection_string))
            .map(|client| MongoSession { client })
            .map_err(|error| format!("failed to open document store session: {error}"))
    }
}

impl DocumentSession for MongoSession {
    fn insert_one(
        &mut self,
        database: &str,
        collection: &str,
        document: Map<String, Value>,
    ) -> Result<(), String> {
        let document = bson::to_document(&document)
            .map_err(|error| format!("feed record cannot be stored as a document: {error}"))?;
        let collection = self
            .client
            .database(database)
            .collection::<Document>(collection);

        block_on(async move { collection.insert_one(document).await })
            .map(|_| ())
            .map_err(|error| format!("failed to insert feed document: {error}"))
    }

    fn close(self) {
        block_on(self.client.shutdown());
    }
}
