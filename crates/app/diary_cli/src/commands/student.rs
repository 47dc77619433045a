use chrono::NaiveDate;
use diary_api_client::{ApiGateway, StudentApi};
use diary_core::routes::{Route, StudentView};
use diary_core::validation;

use crate::cli::StudentCommand;
use crate::commands::authorize;
use crate::commands::output::print_json;
use crate::{Error, Result};

fn date(input: Option<&str>) -> Result<Option<NaiveDate>> {
    Ok(input
        .map(|d| validation::parse_date("date", d))
        .transpose()?)
}

pub async fn run(gateway: &ApiGateway, command: StudentCommand) -> Result<()> {
    let view = match command {
        StudentCommand::Marks => StudentView::Marks,
        _ => StudentView::Schedule,
    };
    authorize(gateway, Route::Student(view)).await?;

    let api = StudentApi::new(gateway);
    match command {
        StudentCommand::Schedule { date: day } => {
            let day = date(day.as_deref())?;
            print_json(&api.schedule(day).await.map_err(Error::api("fetch schedule"))?)
        }
        StudentCommand::Schedules { date: day } => {
            let day = date(day.as_deref())?;
            print_json(
                &api.schedules(day)
                    .await
                    .map_err(Error::api("fetch schedules"))?,
            )
        }
        StudentCommand::Marks => print_json(&api.marks().await.map_err(Error::api("fetch marks"))?),
        StudentCommand::Hometasks { date: day } => {
            let day = date(day.as_deref())?;
            print_json(
                &api.hometasks(day)
                    .await
                    .map_err(Error::api("fetch home tasks"))?,
            )
        }
    }
}
