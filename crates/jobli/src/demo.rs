//! Sample employers, jobs and seekers for local runs against the in-memory
//! backend.

use jobli_core::employer::{
    Address, CreateEmployerJobRequest, CreateEmployerRequest, JobScope, ScreeningAnswer,
};
use jobli_core::seeker::{AnswersRequest, CreateJobSeekerRequest, ExperienceRequest};
use jobli_core::storage::{Result, TableBackend};

use crate::state::AppState;

const DEMO_ACTOR: &str = "demo";

const QUESTIONS: [(&str, &str); 10] = [
    ("weekends", "Available on weekends?"),
    ("nights", "Available for night shifts?"),
    ("driving", "Holds a driving license?"),
    ("lifting", "Comfortable lifting heavy loads?"),
    ("customers", "Enjoys working with customers?"),
    ("outdoors", "Comfortable working outdoors?"),
    ("team", "Prefers working in a team?"),
    ("kosher", "Familiar with kosher kitchens?"),
    ("english", "Speaks English?"),
    ("immediate", "Can start immediately?"),
];

fn screening(values: [bool; 10]) -> Vec<ScreeningAnswer> {
    QUESTIONS
        .iter()
        .zip(values)
        .map(|((key, question), answer)| ScreeningAnswer::new(*key, *question, answer))
        .collect()
}

fn employer_request(email: &str, business_name: &str, city: &str) -> CreateEmployerRequest {
    let mut request = CreateEmployerRequest::new(email, business_name);
    request.address = Address {
        city: Some(city.to_string()),
        ..Address::default()
    };
    request
}

fn seeker_request(full_name: &str, address: &str, email: &str) -> CreateJobSeekerRequest {
    CreateJobSeekerRequest {
        full_name: full_name.to_string(),
        birth_date: 946_684_800_000,
        address: address.to_string(),
        email: email.to_string(),
        languages: Some(vec!["he".to_string(), "en".to_string()]),
        about_me: None,
        job_ambitions: None,
        hobbies: None,
    }
}

/// Populates the state with a small, fixed data set.
pub async fn seed_demo_data<B: TableBackend>(state: &AppState<B>) -> Result<()> {
    let bakery = state
        .employers
        .create(
            employer_request("jobs@bakery.test", "Lev Bakery", "Haifa")
                .with_website("https://bakery.test"),
            DEMO_ACTOR,
        )
        .await?;
    let garage = state
        .employers
        .create(
            employer_request("hr@garage.test", "North Garage", "Akko"),
            DEMO_ACTOR,
        )
        .await?;

    let jobs = [
        (bakery.id, "Night baker", [F, T, F, T, F, F, T, T, F, T]),
        (bakery.id, "Counter staff", [T, F, F, F, T, F, T, T, T, T]),
        (garage.id, "Tow truck driver", [T, T, T, T, F, T, F, F, F, T]),
    ];
    for (employer_id, name, answers) in jobs {
        state
            .jobs
            .create(
                employer_id,
                CreateEmployerJobRequest::new(name, JobScope::Full)
                    .with_answers(screening(answers)),
                DEMO_ACTOR,
            )
            .await?;
    }

    let seekers = [
        ("demo-noa", "Noa Levi", "Haifa", [F, T, F, T, F, F, T, T, F, T]),
        ("demo-amir", "Amir Cohen", "Tel Aviv", [T, T, T, T, F, T, F, F, T, T]),
        ("demo-dana", "Dana Katz", "Jerusalem", [T, F, F, F, T, F, T, F, T, F]),
    ];
    for (id, name, address, answers) in seekers {
        let email = format!("{id}@example.com");
        state
            .seekers
            .create(id, seeker_request(name, address, &email), id)
            .await?;
        state
            .answers
            .create(
                id,
                name,
                AnswersRequest {
                    answers: answers.iter().map(|a| Some(*a)).collect(),
                },
                id,
            )
            .await?;
    }

    state
        .experience
        .create(
            "demo-noa",
            ExperienceRequest {
                workplace: "Cafe Nordau".to_string(),
                year_start: 2019,
                year_end: 2022,
                role: "Barista".to_string(),
                role_description: "Opening shifts".to_string(),
            },
            "demo-noa",
        )
        .await?;

    tracing::info!("Seeded demo data");
    Ok(())
}

const T: bool = true;
const F: bool = false;
