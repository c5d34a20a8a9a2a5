use indexmap::IndexMap;

use super::{
    name::{Name, Role},
    record::Record,
};

/// Every contributor in a corpus and the records they appear in.
///
/// Names are kept raw (`Last, First`) and compared exactly. Record keys are
/// listed once per person, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonIndex {
    people: IndexMap<Name, Vec<String>>,
}

impl PersonIndex {
    /// Indexes `records` in iteration order, visiting roles in [`Role::ALL`]
    /// order within each record.
    pub fn build<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut index = Self::default();
        for record in records {
            for role in Role::ALL {
                for name in record.contributors(role) {
                    index.append(name, &record.key);
                }
            }
        }
        index
    }

    /// Records `key` against `name` unless it is already listed.
    pub fn append(&mut self, name: &Name, key: &str) {
        let keys = self.people.entry(name.clone()).or_default();
        if !keys.iter().any(|existing| existing == key) {
            keys.push(key.to_string());
        }
    }

    /// The records `name` appears in.
    #[must_use]
    pub fn records(&self, name: &Name) -> Option<&[String]> {
        self.people.get(name).map(Vec::as_slice)
    }

    /// Every person with their records, sorted by name.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&Name, &[String])> {
        let mut people: Vec<_> = self
            .people
            .iter()
            .map(|(name, keys)| (name, keys.as_slice()))
            .collect();
        people.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        people
    }

    /// The number of distinct people.
    #[must_use]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether nobody was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::links::tests::record;

    fn contributed(key: &str, presenters: &[&str], authors: &[&str]) -> Record {
        Record {
            key: key.to_string(),
            presenters: presenters.iter().map(|name| Name::new(*name)).collect(),
            authors: authors.iter().map(|name| Name::new(*name)).collect(),
            ..record()
        }
    }

    #[test]
    fn keys_are_appended_once_in_first_seen_order() {
        let records = [
            contributed("b/two", &["Doe, Jane"], &["Doe, Jane"]),
            contributed("a/one", &["Roe, Rick", "Doe, Jane"], &[]),
        ];

        let index = PersonIndex::build(&records);

        assert_eq!(
            index.records(&Name::new("Doe, Jane")).unwrap(),
            ["b/two", "a/one"]
        );
        assert_eq!(index.records(&Name::new("Roe, Rick")).unwrap(), ["a/one"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn names_are_compared_exactly() {
        let records = [contributed("a/one", &["Doe, Jane", "Doe,Jane"], &[])];
        let index = PersonIndex::build(&records);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn sorted_by_raw_name() {
        let records = [contributed("a/one", &["Zed, Ann", "Abel, Bo"], &[])];
        let index = PersonIndex::build(&records);

        let names: Vec<&str> = index.sorted().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Abel, Bo", "Zed, Ann"]);
    }
}
