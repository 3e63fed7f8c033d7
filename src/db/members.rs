use super::{decode_time, encode_time, Db};
use crate::model::{Member, NewMember};
use crate::store::MemberStore;
use crate::{utils, Result};
use anyhow::Context;

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: String,
    user_id: String,
    name: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<MemberRow> for Member {
    type Error = anyhow::Error;

    fn try_from(row: MemberRow) -> Result<Self> {
        Ok(Member {
            created_at: decode_time(&row.created_at)
                .with_context(|| format!("Unable to read member {}", row.id))?,
            updated_at: decode_time(&row.updated_at)
                .with_context(|| format!("Unable to read member {}", row.id))?,
            id: row.id,
            user_id: row.user_id,
            name: row.name,
        })
    }
}

#[async_trait::async_trait]
impl MemberStore for Db {
    async fn create(&self, member: NewMember) -> Result<Member> {
        member.validate()?;
        let now = utils::now();
        let created = Member {
            id: utils::generate_id(),
            user_id: member.user_id,
            name: member.name,
            created_at: now,
            updated_at: now,
        };
        sqlx::query(
            "INSERT INTO members (id, user_id, name, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&created.id)
        .bind(&created.user_id)
        .bind(&created.name)
        .bind(encode_time(created.created_at))
        .bind(encode_time(created.updated_at))
        .execute(self.pool())
        .await
        .with_context(|| format!("Failed to insert member '{}'", created.name))?;
        Ok(created)
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Member>> {
        let row: Option<MemberRow> = sqlx::query_as(
            "SELECT id, user_id, name, created_at, updated_at FROM members WHERE user_id = ? AND id = ?",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .context("Failed to query member")?;
        row.map(Member::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Member>> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            "SELECT id, user_id, name, created_at, updated_at FROM members WHERE user_id = ? ORDER BY name, id",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .context("Failed to query members")?;
        rows.into_iter().map(Member::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::NewMember;
    use crate::store::MemberStore;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_create_get_and_list() {
        let env = TestEnv::new().await;
        let db = env.config().db().clone();

        let bia = db.create(NewMember::new("user-1", "Bia")).await.unwrap();
        let ana = db.create(NewMember::new("user-1", " Ana ")).await.unwrap();
        db.create(NewMember::new("user-2", "Caio")).await.unwrap();

        assert_eq!(ana.name, "Ana");
        assert_eq!(db.list_by_user("user-1").await.unwrap(), vec![ana, bia.clone()]);
        assert_eq!(db.get("user-1", &bia.id).await.unwrap(), Some(bia.clone()));
        assert_eq!(db.get("user-2", &bia.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let env = TestEnv::new().await;
        let db = env.config().db().clone();
        assert!(db.create(NewMember::new("user-1", "  ")).await.is_err());
        assert!(db.list_by_user("user-1").await.unwrap().is_empty());
    }
}
