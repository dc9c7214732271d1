//! In-memory adapters for exercising the services without a database.

use crate::entities::*;
use crate::errors::DomainError;
use crate::repositories::{EmergencyContactRepository, ProfileRepository, UserRepository};
use crate::security::PasswordHasher;
use crate::services::*;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct State {
    users: Vec<User>,
    donors: HashMap<i32, Donor>,
    receivers: HashMap<i32, Receiver>,
    contacts: Vec<EmergencyContact>,
    next_contact_id: i32,
}

impl State {
    fn ensure_no_profile(&self, user_id: i32, role: Role) -> Result<(), DomainError> {
        let (same, other) = match role {
            Role::Donor => (self.donors.contains_key(&user_id), self.receivers.contains_key(&user_id)),
            Role::Receiver => (self.receivers.contains_key(&user_id), self.donors.contains_key(&user_id)),
        };
        if same {
            return Err(DomainError::ProfileAlreadyExists(role));
        }
        if other {
            return Err(DomainError::RoleConflict(role.other()));
        }
        Ok(())
    }

    fn push_contacts(
        &mut self,
        user_id: i32,
        contacts: &[NewEmergencyContact],
        limit: usize,
    ) -> Result<Vec<EmergencyContact>, DomainError> {
        let existing = self.contacts.iter().filter(|c| c.user_id == user_id).count();
        if existing + contacts.len() > limit {
            return Err(DomainError::ContactLimitExceeded { limit });
        }
        let mut stored = Vec::with_capacity(contacts.len());
        for contact in contacts {
            self.next_contact_id += 1;
            let contact = EmergencyContact {
                id: self.next_contact_id,
                user_id,
                name: contact.name.clone(),
                phone: contact.phone.clone(),
                email: contact.email.clone(),
                relation: contact.relation.clone(),
            };
            self.contacts.push(contact.clone());
            stored.push(contact);
        }
        Ok(stored)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn insert_donor(&self, donor: Donor) {
        self.lock().donors.insert(donor.user_id, donor);
    }

    pub fn donor(&self, user_id: i32) -> Option<Donor> {
        self.lock().donors.get(&user_id).cloned()
    }

    pub fn contacts_of(&self, user_id: i32) -> Vec<EmergencyContact> {
        self.lock()
            .contacts
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.iter().find(|u| u.id == Some(id)).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists(user.email.clone()));
        }
        let id = state.users.len() as i32 + 1;
        let stored = User::with_id(id, user.name.clone(), user.email.clone(), user.password_hash.clone());
        state.users.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_donor(&self, user_id: i32) -> Result<Option<Donor>, DomainError> {
        Ok(self.donor(user_id))
    }

    async fn find_receiver(&self, user_id: i32) -> Result<Option<Receiver>, DomainError> {
        Ok(self.lock().receivers.get(&user_id).cloned())
    }

    async fn create_donor(
        &self,
        donor: &Donor,
        contacts: &[NewEmergencyContact],
    ) -> Result<Donor, DomainError> {
        let mut state = self.lock();
        state.ensure_no_profile(donor.user_id, Role::Donor)?;
        state.push_contacts(donor.user_id, contacts, MAX_EMERGENCY_CONTACTS)?;
        state.donors.insert(donor.user_id, donor.clone());
        Ok(donor.clone())
    }

    async fn create_receiver(
        &self,
        receiver: &Receiver,
        contacts: &[NewEmergencyContact],
    ) -> Result<Receiver, DomainError> {
        let mut state = self.lock();
        state.ensure_no_profile(receiver.user_id, Role::Receiver)?;
        state.push_contacts(receiver.user_id, contacts, MAX_EMERGENCY_CONTACTS)?;
        state.receivers.insert(receiver.user_id, receiver.clone());
        Ok(receiver.clone())
    }
}

#[async_trait]
impl EmergencyContactRepository for InMemoryStore {
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<EmergencyContact>, DomainError> {
        Ok(self.contacts_of(user_id))
    }

    async fn count_by_user(&self, user_id: i32) -> Result<usize, DomainError> {
        Ok(self.contacts_of(user_id).len())
    }

    async fn add_for_user(
        &self,
        user_id: i32,
        contacts: &[NewEmergencyContact],
        limit: usize,
    ) -> Result<Vec<EmergencyContact>, DomainError> {
        self.lock().push_contacts(user_id, contacts, limit)
    }
}

/// Reversible stand-in for a real hash; good enough to check that the
/// plaintext is never stored.
pub struct PlainPrefixHasher;

#[async_trait]
impl PasswordHasher for PlainPrefixHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("hashed:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash.strip_prefix("hashed:") == Some(password))
    }
}

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub users: UserService,
    pub profiles: ProfileService,
    pub contacts: EmergencyContactService,
    pub dashboard: DashboardService,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        Self {
            users: UserService::new(store.clone(), store.clone(), Arc::new(PlainPrefixHasher)),
            profiles: ProfileService::new(store.clone(), store.clone()),
            contacts: EmergencyContactService::new(store.clone(), store.clone(), store.clone()),
            dashboard: DashboardService::new(store.clone(), store.clone(), store.clone()),
            store,
        }
    }

    /// Registers a user and returns its id.
    pub async fn registered(&self, email: &str) -> i32 {
        self.users
            .register(Registration {
                name: "Test User".to_string(),
                email: email.to_string(),
                password: "longenough".to_string(),
            })
            .await
            .unwrap()
            .id
            .unwrap()
    }
}

pub fn donor_for(user_id: i32) -> Donor {
    Donor {
        user_id,
        blood_type: BloodType::APositive,
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        gender: Gender::Male,
        phone: PhoneNumber::parse("0123456789").unwrap(),
    }
}

pub fn contact(name: &str) -> NewEmergencyContact {
    NewEmergencyContact::new(name, "5550001111", "contact@x.com", "Friend").unwrap()
}
