//! In-memory contact list
//!
//! Keeps records in insertion order. Ids come from the caller and are not
//! checked for uniqueness; deleting removes every record with the id.

use std::sync::{PoisonError, RwLock};

use super::{Contact, ContactFields, ContactStore, CreateContact, StoreError, StoreResult};

const BACKEND: &str = "memory";

#[derive(Debug, Default)]
pub struct MemoryContactStore {
    contacts: RwLock<Vec<Contact>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the two demo contacts.
    pub fn with_sample_contacts() -> Self {
        Self::from_contacts(vec![
            Contact {
                id: 1,
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
                phone: "1234567890".to_string(),
            },
            Contact {
                id: 2,
                name: "Jane Smith".to_string(),
                email: "jane@example.com".to_string(),
                phone: "0987654321".to_string(),
            },
        ])
    }

    pub fn from_contacts(contacts: Vec<Contact>) -> Self {
        Self {
            contacts: RwLock::new(contacts),
        }
    }

    const fn unsupported(operation: &'static str) -> StoreError {
        StoreError::Unsupported {
            operation,
            backend: BACKEND,
        }
    }
}

impl ContactStore for MemoryContactStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn supports_lookup(&self) -> bool {
        false
    }

    fn list(&self) -> StoreResult<Vec<Contact>> {
        let contacts = self.contacts.read().unwrap_or_else(PoisonError::into_inner);
        Ok(contacts.clone())
    }

    fn create(&self, payload: CreateContact) -> StoreResult<Contact> {
        let Some(id) = payload.id else {
            return Err(StoreError::Validation("missing field `id`".to_string()));
        };
        payload.fields.validate()?;

        let contact = Contact::new(id, payload.fields);
        self.contacts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(contact.clone());
        Ok(contact)
    }

    fn get(&self, _id: i64) -> StoreResult<Contact> {
        Err(Self::unsupported("get"))
    }

    fn update(&self, _id: i64, _fields: ContactFields) -> StoreResult<Contact> {
        Err(Self::unsupported("update"))
    }

    fn delete(&self, id: i64) -> StoreResult<()> {
        self.contacts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|c| c.id != id);
        Ok(())
    }
}
