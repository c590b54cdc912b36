use serde::{Deserialize, Serialize};

/// A single family member record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub first_name: String,
    pub age: i64,
    pub lucky_numbers: Vec<i64>,
}

impl Member {
    /// Create a new member record
    pub fn new(id: i64, first_name: impl Into<String>, age: i64, lucky_numbers: Vec<i64>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            age,
            lucky_numbers,
        }
    }
}

/// In-memory member store, kept in insertion order.
///
/// Lookups are linear scans. The store does not check id uniqueness and
/// does no locking; callers serialize access and enforce the id convention.
#[derive(Debug, Clone, Default)]
pub struct MemberStore {
    last_name: String,
    members: Vec<Member>,
}

impl MemberStore {
    /// Create a store for `last_name`, adding `initial_members` in order
    pub fn new(last_name: impl Into<String>, initial_members: Vec<Member>) -> Self {
        let mut store = Self {
            last_name: last_name.into(),
            members: Vec::with_capacity(initial_members.len()),
        };
        for member in initial_members {
            store.add(member);
        }
        store
    }

    /// The Jackson family with its three founding members
    pub fn seeded() -> Self {
        Self::new(
            "Jackson",
            vec![
                Member::new(1, "John", 33, vec![7, 13, 22]),
                Member::new(2, "Jane", 35, vec![10, 14, 3]),
                Member::new(3, "Jimmy", 5, vec![1]),
            ],
        )
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Append a member to the end of the collection
    pub fn add(&mut self, member: Member) {
        self.members.push(member);
    }

    /// Remove every member with the given id, returning how many were removed.
    /// Removing an absent id is a no-op.
    pub fn remove(&mut self, id: i64) -> usize {
        let before = self.members.len();
        self.members.retain(|member| member.id != id);
        before - self.members.len()
    }

    /// Get the first member with the given id
    pub fn find(&self, id: i64) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.find(id).is_some()
    }

    /// All members in insertion order
    pub fn list(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }
}
