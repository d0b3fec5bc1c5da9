//! Session introspection: `$listSessions`, `$listLocalSessions`,
//! `$listSampledQueries`.

use serde_json::{json, Value};

use aggro_core::{Document, DocumentExt, Error, Operator, Result};

use crate::validate::non_empty;

/// `{"user": ..., "db": ...}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    user: String,
    db: String,
}

impl SessionUser {
    pub fn new(user: impl Into<String>, db: impl Into<String>) -> Result<Self> {
        Ok(Self {
            user: non_empty(user, "session user")?,
            db: non_empty(db, "session user db")?,
        })
    }

    fn to_value(&self) -> Value {
        json!({"user": self.user, "db": self.db})
    }
}

// `users` and `allUsers` exclude each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum SessionFilter {
    #[default]
    CurrentUser,
    Users(Vec<SessionUser>),
    AllUsers,
}

impl SessionFilter {
    fn users<I>(users: I) -> Result<Self>
    where
        I: IntoIterator<Item = SessionUser>,
    {
        let users: Vec<SessionUser> = users.into_iter().collect();
        if users.is_empty() {
            return Err(Error::missing("session user list is empty"));
        }
        Ok(SessionFilter::Users(users))
    }

    fn to_value(&self) -> Value {
        match self {
            SessionFilter::CurrentUser => json!({}),
            SessionFilter::Users(users) => Value::Object(Document::new().with(
                "users",
                Value::Array(users.iter().map(SessionUser::to_value).collect()),
            )),
            SessionFilter::AllUsers => json!({"allUsers": true}),
        }
    }
}

/// `$listSessions` over `config.system.sessions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSessions(SessionFilter);

impl ListSessions {
    /// Sessions of the current user.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_users<I>(users: I) -> Result<Self>
    where
        I: IntoIterator<Item = SessionUser>,
    {
        Ok(Self(SessionFilter::users(users)?))
    }

    pub fn all_users() -> Self {
        Self(SessionFilter::AllUsers)
    }
}

impl Operator for ListSessions {
    fn name(&self) -> &'static str {
        "$listSessions"
    }

    fn arguments(&self) -> Value {
        self.0.to_value()
    }
}

/// `$listLocalSessions` from the connected server's memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListLocalSessions(SessionFilter);

impl ListLocalSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_users<I>(users: I) -> Result<Self>
    where
        I: IntoIterator<Item = SessionUser>,
    {
        Ok(Self(SessionFilter::users(users)?))
    }

    pub fn all_users() -> Self {
        Self(SessionFilter::AllUsers)
    }
}

impl Operator for ListLocalSessions {
    fn name(&self) -> &'static str {
        "$listLocalSessions"
    }

    fn arguments(&self) -> Value {
        self.0.to_value()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSampledQueries {
    namespace: Option<String>,
}

impl ListSampledQueries {
    pub fn new() -> Self {
        Self::default()
    }

    /// `"db.collection"`
    pub fn namespace(mut self, ns: impl Into<String>) -> Result<Self> {
        let ns = non_empty(ns, "$listSampledQueries namespace")?;
        if !ns.contains('.') {
            return Err(Error::invalid(format!(
                "namespace must be '<db>.<collection>', got '{ns}'"
            )));
        }
        self.namespace = Some(ns);
        Ok(self)
    }
}

impl Operator for ListSampledQueries {
    fn name(&self) -> &'static str {
        "$listSampledQueries"
    }

    fn arguments(&self) -> Value {
        Value::Object(Document::new().with_opt("namespace", self.namespace.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(op: &impl Operator) -> Value {
        Value::Object(op.to_document())
    }

    #[test]
    fn test_list_sessions() {
        assert_eq!(doc(&ListSessions::new()), json!({"$listSessions": {}}));
        assert_eq!(
            doc(&ListSessions::all_users()),
            json!({"$listSessions": {"allUsers": true}})
        );
        let users = [SessionUser::new("alice", "admin").unwrap()];
        assert_eq!(
            doc(&ListSessions::for_users(users).unwrap()),
            json!({"$listSessions": {"users": [{"user": "alice", "db": "admin"}]}})
        );
        assert!(ListSessions::for_users([]).is_err());
    }

    #[test]
    fn test_list_local_sessions() {
        assert_eq!(doc(&ListLocalSessions::new()), json!({"$listLocalSessions": {}}));
        assert_eq!(
            doc(&ListLocalSessions::all_users()),
            json!({"$listLocalSessions": {"allUsers": true}})
        );
        assert!(SessionUser::new("", "admin").is_err());
    }

    #[test]
    fn test_list_sampled_queries() {
        assert_eq!(doc(&ListSampledQueries::new()), json!({"$listSampledQueries": {}}));
        let q = ListSampledQueries::new().namespace("shop.orders").unwrap();
        assert_eq!(doc(&q), json!({"$listSampledQueries": {"namespace": "shop.orders"}}));
        assert!(ListSampledQueries::new().namespace("orders").is_err());
    }
}
