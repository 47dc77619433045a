//! `diary teacher ...`: the teacher views, one subcommand per resource.
//!
//! Each command is guarded by the route of the view it stands in for, and
//! inputs are validated before any request is sent.

use diary_api_client::{ApiGateway, TeacherApi};
use diary_core::models::school::{
    HomeTaskInput, LessonInput, MarkInput, ScheduleInput, StudentInput, StudentProfile,
};
use diary_core::routes::{Route, TeacherView};
use diary_core::validation;

use crate::cli::{
    HomeTaskArgs, HomeTaskCommand, LessonCommand, MarkArgs, MarkCommand, ScheduleArgs,
    ScheduleCommand, StudentAdminCommand, StudentArgs, TeacherCommand,
};
use crate::commands::authorize;
use crate::commands::output::print_json;
use crate::{Error, Result};

pub async fn run(gateway: &ApiGateway, command: TeacherCommand) -> Result<()> {
    authorize(gateway, route_for(&command)).await?;

    let api = TeacherApi::new(gateway);
    match command {
        TeacherCommand::Lessons(cmd) => lessons(&api, cmd).await,
        TeacherCommand::Schedules(cmd) => schedules(&api, cmd).await,
        TeacherCommand::Students(cmd) => students(&api, cmd).await,
        TeacherCommand::Marks(cmd) => marks(&api, cmd).await,
        TeacherCommand::Periods => {
            let periods = api.periods().await.map_err(Error::api("fetch periods"))?;
            print_json(&periods)
        }
        TeacherCommand::Hometasks(cmd) => hometasks(&api, cmd).await,
    }
}

/// The view a command belongs to.
fn route_for(command: &TeacherCommand) -> Route {
    let view = match command {
        TeacherCommand::Lessons(_) => TeacherView::Lessons,
        TeacherCommand::Schedules(_) | TeacherCommand::Periods => TeacherView::Schedules,
        TeacherCommand::Students(StudentAdminCommand::Marks { id }) => {
            TeacherView::StudentMarks(*id)
        }
        TeacherCommand::Students(_) => TeacherView::Students,
        TeacherCommand::Marks(_) => TeacherView::Marks,
        TeacherCommand::Hometasks(_) => TeacherView::Dashboard,
    };
    Route::Teacher(view)
}

async fn lessons(api: &TeacherApi<'_>, command: LessonCommand) -> Result<()> {
    match command {
        LessonCommand::List => {
            print_json(&api.lessons().await.map_err(Error::api("fetch lessons"))?)
        }
        LessonCommand::Create { name } => {
            let input = LessonInput { name };
            input.validate()?;
            let lesson = api
                .create_lesson(&input)
                .await
                .map_err(Error::api("add lesson"))?;
            print_json(&lesson)
        }
        LessonCommand::Update { id, name } => {
            let input = LessonInput { name };
            input.validate()?;
            let lesson = api
                .update_lesson(id, &input)
                .await
                .map_err(Error::api("update lesson"))?;
            print_json(&lesson)
        }
        LessonCommand::Delete { id } => {
            api.delete_lesson(id)
                .await
                .map_err(Error::api("delete lesson"))?;
            println!("Lesson {id} deleted.");
            Ok(())
        }
    }
}

fn schedule_input(args: ScheduleArgs) -> Result<ScheduleInput> {
    let input = ScheduleInput {
        lesson_id: args.lesson,
        date: validation::parse_date("date", &args.date)?,
        period_id: args.period,
    };
    input.validate()?;
    Ok(input)
}

async fn schedules(api: &TeacherApi<'_>, command: ScheduleCommand) -> Result<()> {
    match command {
        ScheduleCommand::List => print_json(
            &api.schedules()
                .await
                .map_err(Error::api("fetch schedules"))?,
        ),
        ScheduleCommand::Create(args) => {
            let input = schedule_input(args)?;
            let created = api
                .create_schedule(&input)
                .await
                .map_err(Error::api("add schedule"))?;
            print_json(&created)
        }
        ScheduleCommand::Update { id, args } => {
            let input = schedule_input(args)?;
            let updated = api
                .update_schedule(id, &input)
                .await
                .map_err(Error::api("update schedule"))?;
            print_json(&updated)
        }
        ScheduleCommand::Delete { id } => {
            api.delete_schedule(id)
                .await
                .map_err(Error::api("delete schedule"))?;
            println!("Schedule {id} deleted.");
            Ok(())
        }
    }
}

fn student_input(args: StudentArgs, creating: bool) -> Result<StudentInput> {
    let date_of_birth = args
        .date_of_birth
        .as_deref()
        .map(|d| validation::parse_date("date_of_birth", d))
        .transpose()?;
    let input = StudentInput {
        username: args.username,
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
        password: args.password,
        profile: StudentProfile {
            date_of_birth,
            address: args.address,
        },
    };
    input.validate(creating)?;
    Ok(input)
}

async fn students(api: &TeacherApi<'_>, command: StudentAdminCommand) -> Result<()> {
    match command {
        StudentAdminCommand::List => {
            print_json(&api.students().await.map_err(Error::api("fetch students"))?)
        }
        StudentAdminCommand::Create(args) => {
            let input = student_input(args, true)?;
            let student = api
                .create_student(&input)
                .await
                .map_err(Error::api("add student"))?;
            print_json(&student)
        }
        StudentAdminCommand::Update { id, args } => {
            let input = student_input(args, false)?;
            let student = api
                .update_student(id, &input)
                .await
                .map_err(Error::api("update student"))?;
            print_json(&student)
        }
        StudentAdminCommand::Delete { id } => {
            api.delete_student(id)
                .await
                .map_err(Error::api("delete student"))?;
            println!("Student {id} deleted.");
            Ok(())
        }
        StudentAdminCommand::Marks { id } => print_json(
            &api.student_marks(id)
                .await
                .map_err(Error::api("fetch student marks"))?,
        ),
    }
}

fn mark_input(args: MarkArgs) -> Result<MarkInput> {
    let input = MarkInput {
        student: args.student,
        schedule: args.schedule,
        mark: validation::parse_mark(&args.mark)?,
    };
    input.validate()?;
    Ok(input)
}

async fn marks(api: &TeacherApi<'_>, command: MarkCommand) -> Result<()> {
    match command {
        MarkCommand::List => print_json(&api.marks().await.map_err(Error::api("fetch marks"))?),
        MarkCommand::Create(args) => {
            let input = mark_input(args)?;
            let mark = api
                .create_mark(&input)
                .await
                .map_err(Error::api("assign mark"))?;
            print_json(&mark)
        }
        MarkCommand::Update { id, args } => {
            let input = mark_input(args)?;
            let mark = api
                .update_mark(id, &input)
                .await
                .map_err(Error::api("update mark"))?;
            print_json(&mark)
        }
        MarkCommand::Delete { id } => {
            api.delete_mark(id)
                .await
                .map_err(Error::api("delete mark"))?;
            println!("Mark {id} deleted.");
            Ok(())
        }
    }
}

async fn hometasks(api: &TeacherApi<'_>, command: HomeTaskCommand) -> Result<()> {
    match command {
        HomeTaskCommand::List => print_json(
            &api.hometasks()
                .await
                .map_err(Error::api("fetch home tasks"))?,
        ),
        HomeTaskCommand::Create(HomeTaskArgs {
            schedule,
            description,
        }) => {
            let input = HomeTaskInput {
                schedule,
                description,
            };
            input.validate()?;
            let task = api
                .create_hometask(&input)
                .await
                .map_err(Error::api("add home task"))?;
            print_json(&task)
        }
        HomeTaskCommand::Update {
            id,
            args: HomeTaskArgs {
                schedule,
                description,
            },
        } => {
            let input = HomeTaskInput {
                schedule,
                description,
            };
            input.validate()?;
            let task = api
                .update_hometask(id, &input)
                .await
                .map_err(Error::api("update home task"))?;
            print_json(&task)
        }
        HomeTaskCommand::Delete { id } => {
            api.delete_hometask(id)
                .await
                .map_err(Error::api("delete home task"))?;
            println!("Home task {id} deleted.");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diary_core::validation::ValidationError;

    #[test]
    fn student_marks_guard_carries_the_student_id() {
        let cmd = TeacherCommand::Students(StudentAdminCommand::Marks { id: 7 });
        assert_eq!(
            route_for(&cmd),
            Route::Teacher(TeacherView::StudentMarks(7))
        );
        assert_eq!(
            route_for(&TeacherCommand::Periods),
            Route::Teacher(TeacherView::Schedules)
        );
    }

    #[test]
    fn mark_input_rejects_fractional_and_out_of_range() {
        let args = |mark: &str| MarkArgs {
            student: 1,
            schedule: 2,
            mark: mark.into(),
        };
        assert_eq!(mark_input(args("12")).unwrap().mark, 12);
        assert!(matches!(
            mark_input(args("7.5")),
            Err(Error::Validation(ValidationError::NotInteger("mark")))
        ));
        assert!(matches!(
            mark_input(args("0")),
            Err(Error::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn student_create_requires_password() {
        let args = StudentArgs {
            username: "pupil_1".into(),
            email: String::new(),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            password: None,
            date_of_birth: Some("2010-05-01".into()),
            address: None,
        };
        assert!(matches!(
            student_input(args, true),
            Err(Error::Validation(ValidationError::Required("password")))
        ));
    }
}
