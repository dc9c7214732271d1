use super::sqlite_emergency_contact_repository::{insert_capped, NewEmergencyContactModel};
use crate::database::{donors, receivers, run_blocking, SqlitePool, StoreError};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use domain::{
    BloodType, DomainError, Donor, Gender, NewEmergencyContact, PhoneNumber, ProfileRepository,
    Receiver, Role, MAX_EMERGENCY_CONTACTS,
};

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = donors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct DonorModel {
    user_id: i32,
    blood_type: String,
    dob: NaiveDate,
    gender: i32,
    phone: String,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = receivers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ReceiverModel {
    user_id: i32,
    required_blood_type: String,
    phone: String,
}

fn corrupt(table: &str, user_id: i32, column: &str) -> DomainError {
    DomainError::repository(format!("{table} row {user_id} has an invalid {column}"))
}

impl TryFrom<DonorModel> for Donor {
    type Error = DomainError;

    fn try_from(model: DonorModel) -> Result<Self, Self::Error> {
        Ok(Donor {
            user_id: model.user_id,
            blood_type: BloodType::from_label(&model.blood_type)
                .ok_or_else(|| corrupt("donors", model.user_id, "blood_type"))?,
            date_of_birth: model.dob,
            gender: Gender::from_code(model.gender)
                .ok_or_else(|| corrupt("donors", model.user_id, "gender"))?,
            phone: PhoneNumber::parse(&model.phone)
                .map_err(|_| corrupt("donors", model.user_id, "phone"))?,
        })
    }
}

impl From<&Donor> for DonorModel {
    fn from(donor: &Donor) -> Self {
        DonorModel {
            user_id: donor.user_id,
            blood_type: donor.blood_type.as_str().to_string(),
            dob: donor.date_of_birth,
            gender: donor.gender.code(),
            phone: donor.phone.as_str().to_string(),
        }
    }
}

impl TryFrom<ReceiverModel> for Receiver {
    type Error = DomainError;

    fn try_from(model: ReceiverModel) -> Result<Self, Self::Error> {
        Ok(Receiver {
            user_id: model.user_id,
            required_blood_type: BloodType::from_label(&model.required_blood_type)
                .ok_or_else(|| corrupt("receivers", model.user_id, "required_blood_type"))?,
            phone: PhoneNumber::parse(&model.phone)
                .map_err(|_| corrupt("receivers", model.user_id, "phone"))?,
        })
    }
}

impl From<&Receiver> for ReceiverModel {
    fn from(receiver: &Receiver) -> Self {
        ReceiverModel {
            user_id: receiver.user_id,
            required_blood_type: receiver.required_blood_type.as_str().to_string(),
            phone: receiver.phone.as_str().to_string(),
        }
    }
}

fn has_donor(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(donors::table.filter(donors::user_id.eq(user_id))))
        .get_result(conn)
}

fn has_receiver(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        receivers::table.filter(receivers::user_id.eq(user_id)),
    ))
    .get_result(conn)
}

/// Exclusivity check repeated inside the write transaction.
fn ensure_no_profile(conn: &mut SqliteConnection, user_id: i32, role: Role) -> Result<(), StoreError> {
    let donor = has_donor(conn, user_id)?;
    let receiver = has_receiver(conn, user_id)?;
    let (same, other) = match role {
        Role::Donor => (donor, receiver),
        Role::Receiver => (receiver, donor),
    };

    if same {
        return Err(DomainError::ProfileAlreadyExists(role).into());
    }
    if other {
        return Err(DomainError::RoleConflict(role.other()).into());
    }
    Ok(())
}

fn contact_rows(user_id: i32, contacts: &[NewEmergencyContact]) -> Vec<NewEmergencyContactModel> {
    contacts
        .iter()
        .map(|contact| NewEmergencyContactModel::new(user_id, contact))
        .collect()
}

pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn find_donor(&self, user_id: i32) -> Result<Option<Donor>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            Ok(donors::table
                .filter(donors::user_id.eq(user_id))
                .select(DonorModel::as_select())
                .first::<DonorModel>(conn)
                .optional()?)
        })
        .await?;

        result.map(Donor::try_from).transpose()
    }

    async fn find_receiver(&self, user_id: i32) -> Result<Option<Receiver>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            Ok(receivers::table
                .filter(receivers::user_id.eq(user_id))
                .select(ReceiverModel::as_select())
                .first::<ReceiverModel>(conn)
                .optional()?)
        })
        .await?;

        result.map(Receiver::try_from).transpose()
    }

    async fn create_donor(
        &self,
        donor: &Donor,
        contacts: &[NewEmergencyContact],
    ) -> Result<Donor, DomainError> {
        let user_id = donor.user_id;
        let row = DonorModel::from(donor);
        let contacts = contact_rows(user_id, contacts);

        run_blocking(&self.pool, move |conn| {
            conn.immediate_transaction(|conn| {
                ensure_no_profile(conn, user_id, Role::Donor)?;
                diesel::insert_into(donors::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|e| {
                        StoreError::unique_violation_as(e, DomainError::ProfileAlreadyExists(Role::Donor))
                    })?;
                insert_capped(conn, user_id, &contacts, MAX_EMERGENCY_CONTACTS)
            })
        })
        .await?;

        Ok(donor.clone())
    }

    async fn create_receiver(
        &self,
        receiver: &Receiver,
        contacts: &[NewEmergencyContact],
    ) -> Result<Receiver, DomainError> {
        let user_id = receiver.user_id;
        let row = ReceiverModel::from(receiver);
        let contacts = contact_rows(user_id, contacts);

        run_blocking(&self.pool, move |conn| {
            conn.immediate_transaction(|conn| {
                ensure_no_profile(conn, user_id, Role::Receiver)?;
                diesel::insert_into(receivers::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|e| {
                        StoreError::unique_violation_as(
                            e,
                            DomainError::ProfileAlreadyExists(Role::Receiver),
                        )
                    })?;
                insert_capped(conn, user_id, &contacts, MAX_EMERGENCY_CONTACTS)
            })
        })
        .await?;

        Ok(receiver.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, SqliteEmergencyContactRepository, SqliteUserRepository};
    use domain::{EmergencyContactRepository, User, UserRepository};
    use std::sync::Arc;

    struct Setup {
        profiles: SqliteProfileRepository,
        contacts: SqliteEmergencyContactRepository,
        user_id: i32,
    }

    async fn setup() -> Setup {
        let database = Database::in_memory().unwrap();
        let pool = database.get_pool().clone();
        let user = SqliteUserRepository::new(pool.clone())
            .save(&User::new("A".into(), "a@x.com".into(), "hash".into()))
            .await
            .unwrap();
        Setup {
            profiles: SqliteProfileRepository::new(pool.clone()),
            contacts: SqliteEmergencyContactRepository::new(pool),
            user_id: user.id.unwrap(),
        }
    }

    fn donor(user_id: i32) -> Donor {
        Donor {
            user_id,
            blood_type: BloodType::AbNegative,
            date_of_birth: NaiveDate::from_ymd_opt(1985, 7, 20).unwrap(),
            gender: Gender::Other,
            phone: PhoneNumber::parse("0123456789").unwrap(),
        }
    }

    fn receiver(user_id: i32) -> Receiver {
        Receiver {
            user_id,
            required_blood_type: BloodType::ONegative,
            phone: PhoneNumber::parse("9876543210").unwrap(),
        }
    }

    fn contact(name: &str) -> NewEmergencyContact {
        NewEmergencyContact::new(name, "5550001111", "c@x.com", "Parent").unwrap()
    }

    #[tokio::test]
    async fn donor_round_trips_through_storage() {
        let s = setup().await;
        s.profiles
            .create_donor(&donor(s.user_id), &[contact("Jane")])
            .await
            .unwrap();

        assert_eq!(s.profiles.find_donor(s.user_id).await.unwrap(), Some(donor(s.user_id)));
        assert_eq!(s.profiles.find_receiver(s.user_id).await.unwrap(), None);
        assert_eq!(s.contacts.count_by_user(s.user_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn second_donor_profile_is_rejected_in_transaction() {
        let s = setup().await;
        s.profiles.create_donor(&donor(s.user_id), &[]).await.unwrap();

        let err = s
            .profiles
            .create_donor(&donor(s.user_id), &[contact("Jane")])
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::ProfileAlreadyExists(Role::Donor));
        assert_eq!(s.contacts.count_by_user(s.user_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn receiver_is_rejected_for_a_donor() {
        let s = setup().await;
        s.profiles.create_donor(&donor(s.user_id), &[]).await.unwrap();

        let err = s
            .profiles
            .create_receiver(&receiver(s.user_id), &[])
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::RoleConflict(Role::Donor));
        assert_eq!(s.profiles.find_receiver(s.user_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_contact_insert_rolls_back_profile() {
        let s = setup().await;
        s.contacts
            .add_for_user(s.user_id, &[contact("Jane"), contact("John")], 2)
            .await
            .unwrap();

        let err = s
            .profiles
            .create_receiver(&receiver(s.user_id), &[contact("Jim")])
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::ContactLimitExceeded { limit: 2 });
        assert_eq!(s.profiles.find_receiver(s.user_id).await.unwrap(), None);
        assert_eq!(s.contacts.count_by_user(s.user_id).await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_donor_and_receiver_creation_admits_one() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("registry.db");
        let database = Database::new(path.to_str().unwrap()).unwrap();
        let pool = database.get_pool().clone();
        let users = SqliteUserRepository::new(pool.clone());
        let profiles = Arc::new(SqliteProfileRepository::new(pool.clone()));
        let contacts = SqliteEmergencyContactRepository::new(pool);

        for round in 0..10 {
            let user_id = users
                .save(&User::new("A".into(), format!("race{round}@x.com"), "hash".into()))
                .await
                .unwrap()
                .id
                .unwrap();

            let donor_profiles = profiles.clone();
            let as_donor = tokio::spawn(async move {
                donor_profiles
                    .create_donor(&donor(user_id), &[contact("Jane"), contact("John")])
                    .await
                    .map(|_| ())
            });
            let receiver_profiles = profiles.clone();
            let as_receiver = tokio::spawn(async move {
                receiver_profiles
                    .create_receiver(&receiver(user_id), &[contact("Jim"), contact("Joan")])
                    .await
                    .map(|_| ())
            });

            let (donor_result, receiver_result) = tokio::join!(as_donor, as_receiver);
            let results = [donor_result.unwrap(), receiver_result.unwrap()];

            assert_eq!(
                results.iter().filter(|r| r.is_ok()).count(),
                1,
                "round {round}: {results:?}"
            );
            assert!(results
                .iter()
                .any(|r| matches!(r, Err(DomainError::RoleConflict(_)))));
            assert_eq!(contacts.count_by_user(user_id).await.unwrap(), 2);

            let has_donor = profiles.find_donor(user_id).await.unwrap().is_some();
            let has_receiver = profiles.find_receiver(user_id).await.unwrap().is_some();
            assert!(has_donor != has_receiver);
        }
    }

    #[tokio::test]
    async fn profile_for_missing_user_violates_foreign_key() {
        let s = setup().await;
        let err = s.profiles.create_donor(&donor(9999), &[]).await.unwrap_err();
        assert!(err.is_internal());
    }
}
