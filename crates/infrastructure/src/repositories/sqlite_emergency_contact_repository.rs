use crate::database::{emergency_contacts, run_blocking, SqlitePool, StoreError};
use async_trait::async_trait;
use diesel::prelude::*;
use domain::{
    DomainError, EmergencyContact, EmergencyContactRepository, NewEmergencyContact, PhoneNumber,
};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = emergency_contacts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct EmergencyContactModel {
    id: i32,
    user_id: i32,
    name: String,
    phone: String,
    email: String,
    relation: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = emergency_contacts)]
pub(crate) struct NewEmergencyContactModel {
    user_id: i32,
    name: String,
    phone: String,
    email: String,
    relation: String,
}

impl NewEmergencyContactModel {
    pub(crate) fn new(user_id: i32, contact: &NewEmergencyContact) -> Self {
        Self {
            user_id,
            name: contact.name.clone(),
            phone: contact.phone.as_str().to_string(),
            email: contact.email.clone(),
            relation: contact.relation.clone(),
        }
    }
}

impl TryFrom<EmergencyContactModel> for EmergencyContact {
    type Error = DomainError;

    fn try_from(model: EmergencyContactModel) -> Result<Self, Self::Error> {
        let phone = PhoneNumber::parse(&model.phone).map_err(|_| {
            DomainError::repository(format!("emergency contact {} has a malformed phone", model.id))
        })?;

        Ok(EmergencyContact {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            phone,
            email: model.email,
            relation: model.relation,
        })
    }
}

fn load_for_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> QueryResult<Vec<EmergencyContactModel>> {
    emergency_contacts::table
        .filter(emergency_contacts::user_id.eq(user_id))
        .order(emergency_contacts::id.asc())
        .select(EmergencyContactModel::as_select())
        .load::<EmergencyContactModel>(conn)
}

fn count_for_user(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<i64> {
    emergency_contacts::table
        .filter(emergency_contacts::user_id.eq(user_id))
        .count()
        .get_result(conn)
}

/// Counts the user's contacts and inserts `rows` unless the total would exceed
/// `limit`. Must run inside the caller's transaction.
pub(crate) fn insert_capped(
    conn: &mut SqliteConnection,
    user_id: i32,
    rows: &[NewEmergencyContactModel],
    limit: usize,
) -> Result<(), StoreError> {
    let existing = usize::try_from(count_for_user(conn, user_id)?).unwrap_or(usize::MAX);
    if existing.saturating_add(rows.len()) > limit {
        return Err(DomainError::ContactLimitExceeded { limit }.into());
    }

    if !rows.is_empty() {
        diesel::insert_into(emergency_contacts::table)
            .values(rows)
            .execute(conn)?;
    }
    Ok(())
}

pub struct SqliteEmergencyContactRepository {
    pool: SqlitePool,
}

impl SqliteEmergencyContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmergencyContactRepository for SqliteEmergencyContactRepository {
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<EmergencyContact>, DomainError> {
        let models = run_blocking(&self.pool, move |conn| Ok(load_for_user(conn, user_id)?)).await?;
        models.into_iter().map(EmergencyContact::try_from).collect()
    }

    async fn count_by_user(&self, user_id: i32) -> Result<usize, DomainError> {
        let count = run_blocking(&self.pool, move |conn| Ok(count_for_user(conn, user_id)?)).await?;
        usize::try_from(count).map_err(DomainError::repository)
    }

    async fn add_for_user(
        &self,
        user_id: i32,
        contacts: &[NewEmergencyContact],
        limit: usize,
    ) -> Result<Vec<EmergencyContact>, DomainError> {
        let rows: Vec<NewEmergencyContactModel> = contacts
            .iter()
            .map(|contact| NewEmergencyContactModel::new(user_id, contact))
            .collect();
        let added = rows.len();

        let models = run_blocking(&self.pool, move |conn| {
            conn.immediate_transaction(|conn| {
                insert_capped(conn, user_id, &rows, limit)?;
                let mut stored = load_for_user(conn, user_id)?;
                // Ids ascend, so the rows just written are at the end
                Ok(stored.split_off(stored.len().saturating_sub(added)))
            })
        })
        .await?;

        models.into_iter().map(EmergencyContact::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, SqliteUserRepository};
    use domain::{User, UserRepository};

    async fn setup() -> (SqliteEmergencyContactRepository, i32) {
        let database = Database::in_memory().unwrap();
        let pool = database.get_pool().clone();
        let user = SqliteUserRepository::new(pool.clone())
            .save(&User::new("A".into(), "a@x.com".into(), "hash".into()))
            .await
            .unwrap();
        (SqliteEmergencyContactRepository::new(pool), user.id.unwrap())
    }

    fn contact(name: &str) -> NewEmergencyContact {
        NewEmergencyContact::new(name, "0123456789", "c@x.com", "Friend").unwrap()
    }

    #[tokio::test]
    async fn contacts_are_returned_in_insertion_order() {
        let (repo, user_id) = setup().await;

        let added = repo.add_for_user(user_id, &[contact("Jane")], 2).await.unwrap();
        assert_eq!(added.len(), 1);
        let added = repo.add_for_user(user_id, &[contact("John")], 2).await.unwrap();
        assert_eq!(added[0].name, "John");

        let names: Vec<_> = repo
            .find_by_user(user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Jane", "John"]);
        assert_eq!(repo.count_by_user(user_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn cap_is_enforced_without_partial_writes() {
        let (repo, user_id) = setup().await;
        repo.add_for_user(user_id, &[contact("Jane")], 2).await.unwrap();

        let err = repo
            .add_for_user(user_id, &[contact("John"), contact("Jim")], 2)
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::ContactLimitExceeded { limit: 2 });
        assert_eq!(repo.count_by_user(user_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_user_has_no_contacts() {
        let (repo, _) = setup().await;
        assert!(repo.find_by_user(404).await.unwrap().is_empty());
    }
}
