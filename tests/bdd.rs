use std::{collections::HashMap, fmt, fs::File, net::SocketAddr};

use anyhow::Context;
use chrono::NaiveDate;
use cucumber::{given, then, when, World as _};
use globetrotter::{
    auth,
    config::AppConfig,
    db::init_pool,
    error::AppError,
    models::{budget::NewBudgetLine, stop::NewStop, trip::NewTrip, trip_activity::NewScheduledActivity},
    state::AppState,
};
use tempfile::TempDir;

#[derive(Debug, cucumber::World, Default)]
struct AppWorld {
    state: Option<TestState>,
    users: HashMap<String, i64>,
    current_user: Option<i64>,
    last_trip_id: Option<i64>,
    last_stop_id: Option<i64>,
    last_error: Option<AppError>,
}

impl AppWorld {
    fn app_state(&self) -> &AppState {
        self.state
            .as_ref()
            .expect("state must be initialised first")
            .app()
    }

    fn user_id(&self) -> i64 {
        self.current_user.expect("a user must be registered first")
    }

    fn trip_id(&self) -> i64 {
        self.last_trip_id.expect("a trip must be created first")
    }
}

struct TestState {
    app: AppState,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let db_path = root.path().join("bdd.sqlite");
        File::create(&db_path)?;
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let config = AppConfig {
            database_url: database_url.clone(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            session_ttl_days: 7,
        };

        let db = init_pool(&config.database_url).await?;
        sqlx::migrate!("./migrations").run(&db).await?;

        let app = AppState::new(config, db);
        Ok(Self { app, _root: root })
    }

    fn app(&self) -> &AppState {
        &self.app
    }
}

fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("dates in features are ISO formatted")
}

async fn register(world: &mut AppWorld, email: String, password: String) {
    let user = auth::register_user(world.app_state(), &email, &password, None)
        .await
        .expect("register user");
    world.users.insert(email, user.user_id);
    world.current_user = Some(user.user_id);
}

#[given("a fresh application state")]
async fn given_fresh_state(world: &mut AppWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.users.clear();
    world.current_user = None;
    world.last_trip_id = None;
    world.last_stop_id = None;
    world.last_error = None;
}

#[given(regex = r#"^a registered user \"([^\"]+)\" with password \"([^\"]+)\"$"#)]
async fn given_registered_user(world: &mut AppWorld, email: String, password: String) {
    register(world, email, password).await;
}

#[when(regex = r#"^I switch to a registered user \"([^\"]+)\" with password \"([^\"]+)\"$"#)]
async fn when_switch_user(world: &mut AppWorld, email: String, password: String) {
    register(world, email, password).await;
}

#[when(regex = r#"^I create a trip \"([^\"]+)\" from \"([^\"]+)\" to \"([^\"]+)\"$"#)]
async fn when_create_trip(world: &mut AppWorld, name: String, start: String, end: String) {
    let new = NewTrip {
        trip_name: Some(name),
        start_date: Some(parse_date(&start)),
        end_date: Some(parse_date(&end)),
        ..NewTrip::default()
    };
    let user_id = world.user_id();
    let trip = world
        .app_state()
        .trips
        .create_trip(user_id, new)
        .await
        .expect("create trip");
    world.last_trip_id = Some(trip.trip_id);
}

#[when(
    regex = r#"^I add a stop in city (\d+) arriving \"([^\"]+)\" departing \"([^\"]+)\" at position (\d+)$"#
)]
async fn when_add_stop(
    world: &mut AppWorld,
    city_id: i64,
    arrival: String,
    departure: String,
    position: i64,
) {
    let new = NewStop {
        city_id: Some(city_id),
        arrival_date: Some(parse_date(&arrival)),
        departure_date: Some(parse_date(&departure)),
        stop_order: Some(position),
        ..NewStop::default()
    };
    let (user_id, trip_id) = (world.user_id(), world.trip_id());
    match world.app_state().trips.add_stop(user_id, trip_id, new).await {
        Ok(stop) => {
            world.last_stop_id = Some(stop.stop_id);
            world.last_error = None;
        }
        Err(err) => world.last_error = Some(err),
    }
}

#[when(regex = r#"^I schedule activity (\d+) on \"([^\"]+)\" for the latest stop$"#)]
async fn when_schedule_activity(world: &mut AppWorld, activity_id: i64, date: String) {
    let new = NewScheduledActivity {
        activity_id: Some(activity_id),
        scheduled_date: Some(parse_date(&date)),
        ..NewScheduledActivity::default()
    };
    let user_id = world.user_id();
    let stop_id = world.last_stop_id.expect("a stop must exist first");
    world
        .app_state()
        .trips
        .add_scheduled_activity(user_id, stop_id, new)
        .await
        .expect("schedule activity");
}

#[when(regex = r#"^I add a budget line \"([^\"]+)\" of (\d+(?:\.\d+)?)$"#)]
async fn when_add_budget_line(world: &mut AppWorld, category: String, amount: f64) {
    let new = NewBudgetLine {
        category: Some(category),
        estimated_amount: Some(amount),
    };
    let (user_id, trip_id) = (world.user_id(), world.trip_id());
    world
        .app_state()
        .trips
        .add_budget_line(user_id, trip_id, new)
        .await
        .expect("add budget line");
}

#[when(regex = r#"^I update the trip setting is_public to \"(true|false)\"$"#)]
async fn when_update_is_public(world: &mut AppWorld, value: bool) {
    let patch = serde_json::from_value(serde_json::json!({ "is_public": value }))
        .expect("valid trip patch");
    let (user_id, trip_id) = (world.user_id(), world.trip_id());
    world
        .app_state()
        .trips
        .update_trip(user_id, trip_id, patch)
        .await
        .expect("update trip");
}

#[when("I delete the trip")]
async fn when_delete_trip(world: &mut AppWorld) {
    let (user_id, trip_id) = (world.user_id(), world.trip_id());
    world
        .app_state()
        .trips
        .delete_trip(user_id, trip_id)
        .await
        .expect("delete trip");
}

#[then(regex = r"^the trip detail shows (\d+) stops? and (\d+) activit(?:y|ies)$")]
async fn then_detail_counts(world: &mut AppWorld, stops: usize, activities: usize) {
    let (user_id, trip_id) = (world.user_id(), world.trip_id());
    let detail = world
        .app_state()
        .trips
        .get_trip(user_id, trip_id)
        .await
        .expect("get trip");
    assert_eq!(detail.stops.len(), stops);
    let total: usize = detail.stops.iter().map(|s| s.activities.len()).sum();
    assert_eq!(total, activities);
}

#[then(regex = r"^the trip list shows (\d+) trips? and the first has (\d+) stops?$")]
async fn then_list_counts(world: &mut AppWorld, trips: usize, stop_count: i64) {
    let user_id = world.user_id();
    let summaries = world
        .app_state()
        .trips
        .list_trips(user_id)
        .await
        .expect("list trips");
    assert_eq!(summaries.len(), trips);
    let first = summaries.first().expect("at least one trip expected");
    assert_eq!(first.stop_count, stop_count);
}

#[then(regex = r"^the trip list shows (\d+) trips$")]
async fn then_list_len(world: &mut AppWorld, trips: usize) {
    let user_id = world.user_id();
    let summaries = world
        .app_state()
        .trips
        .list_trips(user_id)
        .await
        .expect("list trips");
    assert_eq!(summaries.len(), trips);
}

#[then(regex = r#"^the trip stops are ordered by position \"([^\"]+)\"$"#)]
async fn then_stop_order(world: &mut AppWorld, expected: String) {
    let expected: Vec<i64> = expected
        .split(',')
        .map(|part| part.trim().parse().expect("positions are integers"))
        .collect();
    let (user_id, trip_id) = (world.user_id(), world.trip_id());
    let detail = world
        .app_state()
        .trips
        .get_trip(user_id, trip_id)
        .await
        .expect("get trip");
    let orders: Vec<i64> = detail.stops.iter().map(|s| s.stop.stop_order).collect();
    assert_eq!(orders, expected);
}

#[then("the trip is not public")]
async fn then_trip_private(world: &mut AppWorld) {
    let (user_id, trip_id) = (world.user_id(), world.trip_id());
    let detail = world
        .app_state()
        .trips
        .get_trip(user_id, trip_id)
        .await
        .expect("get trip");
    assert!(!detail.trip.is_public);
}

#[then("the trip can no longer be fetched")]
async fn then_trip_gone(world: &mut AppWorld) {
    let (user_id, trip_id) = (world.user_id(), world.trip_id());
    let result = world.app_state().trips.get_trip(user_id, trip_id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[then("no stops, scheduled activities or budget lines remain")]
async fn then_no_descendants(world: &mut AppWorld) {
    let db = &world.app_state().db;
    for table in ["trip_stops", "trip_activities", "budget_breakdown"] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(db)
            .await
            .expect("count rows");
        assert_eq!(count, 0, "{table} should be empty");
    }
}

#[then("the last operation fails with a validation error")]
async fn then_validation_error(world: &mut AppWorld) {
    assert!(matches!(world.last_error, Some(AppError::Validation(_))));
}

#[tokio::main]
async fn main() {
    AppWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
