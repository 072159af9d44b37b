// End-to-end tests for the recipe feed API
//
// Each test boots the real router on an ephemeral port. The data provider is
// an in-memory implementation seeded with a small fixture set, so the suite
// needs no database and tests run in parallel.
//
// Architecture:
// - TestContext builds provider, services, controllers and router per test
// - TestClient drives the server over HTTP with hyper
// - Failure switches on the provider simulate an unavailable backend

mod helpers;
mod test_categories;
