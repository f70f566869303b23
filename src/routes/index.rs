use crate::{
    error::RosterResult,
    maud_conveniences::{empty_notice, render_table, title},
    state::RosterState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<RosterState>) -> RosterResult<Markup> {
    let students = state.students().get_all().await?;

    let body = if students.is_empty() {
        html! {
            (title("Students"))
            (empty_notice("No students yet."))
        }
    } else {
        render_table(
            "Students",
            ["ID", "Name", "Last Name", "Age", "Course"],
            students.iter().map(|student| student.table_row()).collect(),
        )
    };

    Ok(state.render(html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full" {
            (body)
        }
    }))
}
