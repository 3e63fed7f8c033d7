use crate::args::AddMemberArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::{Member, NewMember};
use crate::store::MemberStore;
use crate::{Config, Result};

/// Adds a member to the household of `user`.
///
/// # Errors
/// - Returns a request error if the name is blank.
/// - Returns a database error if the member cannot be stored.
pub async fn add_member(config: &Config, user: &str, args: &AddMemberArgs) -> Result<Out<Member>> {
    let new = NewMember::new(user, &args.name);
    new.validate().pub_result(ErrorType::Request)?;
    let member = config
        .db()
        .create(new)
        .await
        .pub_result(ErrorType::Database)?;
    Ok(Out::new(
        format!("Added member '{}' with id {}", member.name, member.id),
        member,
    ))
}

pub async fn list_members(config: &Config, user: &str) -> Result<Out<Vec<Member>>> {
    let members = config
        .db()
        .list_by_user(user)
        .await
        .pub_result(ErrorType::Database)?;
    let mut message = format!("{} members", members.len());
    for member in &members {
        message.push_str(&format!("\n  {}  {}", member.id, member.name));
    }
    Ok(Out::new(message, members))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{TestEnv, USER};

    #[tokio::test]
    async fn test_add_then_list() {
        let env = TestEnv::new().await;
        let config = env.config();
        let args = AddMemberArgs {
            name: "Ana".to_string(),
        };
        let added = add_member(&config, USER, &args).await.unwrap();
        let member = added.structure().unwrap().clone();

        let listed = list_members(&config, USER).await.unwrap();
        assert_eq!(listed.structure(), Some(&vec![member.clone()]));
        assert!(listed.message().contains(&member.id));

        let other = list_members(&config, "someone-else").await.unwrap();
        assert_eq!(other.structure(), Some(&Vec::new()));
    }

    #[tokio::test]
    async fn test_blank_name_is_a_request_error() {
        let env = TestEnv::new().await;
        let args = AddMemberArgs {
            name: " ".to_string(),
        };
        let err = add_member(&env.config(), USER, &args).await.unwrap_err();
        assert_eq!(err.to_string(), "request error");
    }
}
