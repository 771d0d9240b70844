//! Integration tests for the enrollment ledger: order creation, settlement,
//! cancellation, and re-enrollment.

use coursegate_core::enrollment::{EnrollmentStatus, OrderStatus};
use coursegate_db::models::course::{Course, CreateCourse};
use coursegate_db::models::user::{CreateUser, User};
use coursegate_db::repositories::{CourseRepo, EnrollmentRepo, OrderRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn learner(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: "not-a-real-hash".to_string(),
            role_id: 3,
        },
    )
    .await
    .unwrap()
}

async fn course(pool: &PgPool, slug: &str) -> Course {
    CourseRepo::create(
        pool,
        &CreateCourse {
            slug: slug.to_string(),
            title: format!("Course {slug}"),
            is_published: true,
            price_cents: 4_900,
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enroll_creates_pending_order_and_enrollment(pool: PgPool) {
    let user = learner(&pool, "alice").await;
    let course = course(&pool, "rust-101").await;

    let outcome = OrderRepo::enroll(&pool, user.id, course.id, course.price_cents)
        .await
        .unwrap();
    assert!(outcome.created);
    assert_eq!(outcome.order.status().unwrap(), OrderStatus::Pending);
    assert_eq!(outcome.order.amount_cents, 4_900);

    let enrollment = EnrollmentRepo::find_latest(&pool, user.id, course.id)
        .await
        .unwrap()
        .expect("enroll should write a pending enrollment");
    assert_eq!(enrollment.status().unwrap(), EnrollmentStatus::Pending);
    assert_eq!(outcome.order.enrollment_id, Some(enrollment.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enroll_twice_returns_same_pending_order(pool: PgPool) {
    let user = learner(&pool, "bob").await;
    let course = course(&pool, "rust-102").await;

    let first = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();
    let second = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.order.id, second.order.id);

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE user_id = $1 AND course_id = $2")
            .bind(user.id)
            .bind(course.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_paid_activates_enrollment(pool: PgPool) {
    let user = learner(&pool, "carol").await;
    let course = course(&pool, "rust-103").await;
    let outcome = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();

    let paid = OrderRepo::mark_paid(&pool, outcome.order.id)
        .await
        .unwrap()
        .expect("pending order should settle");
    assert_eq!(paid.status().unwrap(), OrderStatus::Paid);

    let enrollment = EnrollmentRepo::find_latest(&pool, user.id, course.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(enrollment.status().unwrap(), EnrollmentStatus::Active);

    // A settled order cannot be settled again.
    assert!(OrderRepo::mark_paid(&pool, outcome.order.id)
        .await
        .unwrap()
        .is_none());
    assert!(OrderRepo::mark_failed(&pool, outcome.order.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_payment_allows_new_order(pool: PgPool) {
    let user = learner(&pool, "dave").await;
    let course = course(&pool, "rust-104").await;
    let first = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();

    OrderRepo::mark_failed(&pool, first.order.id)
        .await
        .unwrap()
        .expect("pending order should fail");

    let retry = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();
    assert!(retry.created);
    assert_ne!(retry.order.id, first.order.id);
    // The still-pending enrollment is reused.
    assert_eq!(retry.order.enrollment_id, first.order.enrollment_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reenroll_after_cancel_inserts_new_enrollment(pool: PgPool) {
    let user = learner(&pool, "erin").await;
    let course = course(&pool, "rust-105").await;
    let first = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();
    OrderRepo::mark_paid(&pool, first.order.id).await.unwrap();

    let enrollment_id = first.order.enrollment_id.unwrap();
    let cancelled = EnrollmentRepo::cancel(&pool, enrollment_id)
        .await
        .unwrap()
        .expect("active enrollment should cancel");
    assert_eq!(cancelled.status().unwrap(), EnrollmentStatus::Cancelled);
    assert!(EnrollmentRepo::cancel(&pool, enrollment_id)
        .await
        .unwrap()
        .is_none());

    let again = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();
    assert!(again.created);
    assert_ne!(again.order.enrollment_id, Some(enrollment_id));

    let latest = EnrollmentRepo::find_latest(&pool, user.id, course.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(Some(latest.id), again.order.enrollment_id);
    assert_eq!(latest.status().unwrap(), EnrollmentStatus::Pending);

    // The cancelled row is untouched.
    let old = EnrollmentRepo::find_by_id(&pool, enrollment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(old.status().unwrap(), EnrollmentStatus::Cancelled);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancelling_pending_enrollment_fails_its_open_order(pool: PgPool) {
    let user = learner(&pool, "gwen").await;
    let course = course(&pool, "rust-107").await;
    let first = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();
    let enrollment_id = first.order.enrollment_id.unwrap();

    EnrollmentRepo::cancel(&pool, enrollment_id)
        .await
        .unwrap()
        .expect("pending enrollment should cancel");

    let old_order = OrderRepo::find_by_id(&pool, first.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(old_order.status().unwrap(), OrderStatus::Failed);
    assert!(OrderRepo::mark_paid(&pool, first.order.id)
        .await
        .unwrap()
        .is_none());

    // Re-enrolling opens a fresh order on a fresh enrollment, and paying it
    // grants access.
    let again = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();
    assert!(again.created);
    assert_ne!(again.order.id, first.order.id);
    assert_ne!(again.order.enrollment_id, Some(enrollment_id));

    OrderRepo::mark_paid(&pool, again.order.id)
        .await
        .unwrap()
        .expect("new order should settle");
    let latest = EnrollmentRepo::find_latest(&pool, user.id, course.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.status().unwrap(), EnrollmentStatus::Active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enroll_retires_pending_order_of_cancelled_enrollment(pool: PgPool) {
    let user = learner(&pool, "hank").await;
    let course = course(&pool, "rust-108").await;
    let first = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();
    let enrollment_id = first.order.enrollment_id.unwrap();

    // Cancel the enrollment behind the repository's back, leaving its order open.
    sqlx::query("UPDATE enrollments SET status = 'cancelled' WHERE id = $1")
        .bind(enrollment_id)
        .execute(&pool)
        .await
        .unwrap();
    assert!(OrderRepo::find_pending(&pool, user.id, course.id)
        .await
        .unwrap()
        .is_none());

    let again = OrderRepo::enroll(&pool, user.id, course.id, 100).await.unwrap();
    assert!(again.created);
    assert_ne!(again.order.id, first.order.id);

    let stale = OrderRepo::find_by_id(&pool, first.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stale.status().unwrap(), OrderStatus::Failed);

    OrderRepo::mark_paid(&pool, again.order.id).await.unwrap();
    let latest = EnrollmentRepo::find_latest(&pool, user.id, course.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.status().unwrap(), EnrollmentStatus::Active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ledger_is_per_course(pool: PgPool) {
    let user = learner(&pool, "frank").await;
    let a = course(&pool, "course-a").await;
    let b = course(&pool, "course-b").await;

    let outcome = OrderRepo::enroll(&pool, user.id, a.id, 100).await.unwrap();
    OrderRepo::mark_paid(&pool, outcome.order.id).await.unwrap();

    assert!(EnrollmentRepo::find_latest(&pool, user.id, b.id)
        .await
        .unwrap()
        .is_none());
    assert!(OrderRepo::find_latest(&pool, user.id, b.id)
        .await
        .unwrap()
        .is_none());
}
