use crate::error::{FieldTooLongSnafu, RosterResult};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_LAST_NAME_LEN: usize = 50;
pub const MAX_COURSE_LEN: usize = 15;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    pub age: i32,
    pub course: String,
}

/// Everything about a student apart from the id, which only the store hands out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    pub name: String,
    pub last_name: String,
    pub age: i32,
    pub course: String,
}

impl StudentDetails {
    pub fn validate(&self) -> RosterResult<()> {
        check("name", &self.name, MAX_NAME_LEN)?;
        check("lastName", &self.last_name, MAX_LAST_NAME_LEN)?;
        check("course", &self.course, MAX_COURSE_LEN)
    }

    pub fn with_id(self, id: i64) -> Student {
        let Self {
            name,
            last_name,
            age,
            course,
        } = self;

        Student {
            id,
            name,
            last_name,
            age,
            course,
        }
    }
}

fn check(field: &'static str, value: &str, max: usize) -> RosterResult<()> {
    let len = value.chars().count();
    snafu::ensure!(len <= max, FieldTooLongSnafu { field, len, max });
    Ok(())
}

impl Student {
    pub fn table_row(&self) -> [Markup; 5] {
        [
            html! {(self.id)},
            html! {(self.name)},
            html! {(self.last_name)},
            html! {(self.age)},
            html! {(self.course)},
        ]
    }
}
