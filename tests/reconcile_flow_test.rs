use momo_reconcile::application::intake::{IngestOutcome, MessageIntake};
use momo_reconcile::application::reconciler::Reconciler;
use momo_reconcile::domain::amount::Rwf;
use momo_reconcile::domain::appointment::{Appointment, AppointmentStatus};
use momo_reconcile::domain::ports::{AppointmentStore, MessageStore};
use momo_reconcile::domain::verdict::{Verdict, VerdictStatus};
use momo_reconcile::infrastructure::in_memory::{InMemoryAppointmentStore, InMemoryMessageStore};

mod common;

struct Harness {
    intake: MessageIntake,
    reconciler: Reconciler,
    messages: InMemoryMessageStore,
    appointments: InMemoryAppointmentStore,
}

fn harness() -> Harness {
    let messages = InMemoryMessageStore::new();
    let appointments = InMemoryAppointmentStore::new();
    Harness {
        intake: MessageIntake::new(Box::new(messages.clone())),
        reconciler: Reconciler::new(Box::new(messages.clone()), Box::new(appointments.clone())),
        messages,
        appointments,
    }
}

#[tokio::test]
async fn test_unsupported_messages_are_never_stored() {
    let h = harness();
    let messages = [
        "",
        "*161*TxId:1*R*You have received 100 RWF",
        "*161*TxId:1*R*You have sent 100 RWF to ANN (**1) on your mobile money account at 2024-01-15 10:30:00.",
        "*162*TxId:1*R*You have received 100 RWF from ANN (**1) on your mobile money account at 2024-01-15 10:30:00.",
    ];
    for message in messages {
        let outcome = h.intake.accept(message).await.unwrap();
        assert!(matches!(outcome, IngestOutcome::Ignored { .. }), "{message}");
    }
    assert!(h.messages.find_by_txid("1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_payment_to_confirmation() {
    let h = harness();
    h.appointments
        .store(Appointment::new(10, "ann@example.com", "Ann"))
        .await
        .unwrap();

    let outcome = h
        .intake
        .accept(&common::notification("123456", "7,000", "JOHN DOE"))
        .await
        .unwrap();
    let IngestOutcome::Saved { data } = outcome else {
        panic!("notification should be saved");
    };
    assert_eq!(data.txid, "123456");
    assert_eq!(data.amount, "7,000 RWF");
    assert_eq!(data.sender_name, "JOHN DOE");
    assert_eq!(data.timestamp.as_deref(), Some("2024-01-15 10:30:00"));

    let check = h
        .reconciler
        .check_payment("123456", Rwf::from(7000))
        .await
        .unwrap();
    assert_eq!(check, Verdict::approved("Payment is approved."));

    let verdict = h
        .reconciler
        .verify_request("ann@example.com", "Ann", "123456", Rwf::from(7000))
        .await
        .unwrap();
    assert_eq!(verdict.status, VerdictStatus::Approved);

    let appointment = &h.appointments.all_appointments().await.unwrap()[0];
    assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    assert!(appointment.payment_status);
    assert_eq!(appointment.payment_transaction_id.as_deref(), Some("123456"));

    // Confirmation is one-way and not idempotent.
    let again = h
        .reconciler
        .verify_request("ann@example.com", "Ann", "123456", Rwf::from(7000))
        .await
        .unwrap();
    assert_eq!(
        again,
        Verdict::not_approved("No pending appointment found for this email and name.")
    );
}

#[tokio::test]
async fn test_same_payment_can_confirm_two_appointments() {
    let h = harness();
    h.appointments
        .store(Appointment::new(1, "ann@example.com", "Ann"))
        .await
        .unwrap();
    h.appointments
        .store(Appointment::new(2, "bob@example.com", "Bob"))
        .await
        .unwrap();
    h.intake
        .accept(&common::notification("5", "100", "ANN"))
        .await
        .unwrap();

    // Duplicate transaction use is not prevented.
    for (email, name) in [("ann@example.com", "Ann"), ("bob@example.com", "Bob")] {
        let verdict = h
            .reconciler
            .verify_and_update("5", email, name, Rwf::from(100))
            .await
            .unwrap();
        assert!(verdict.is_approved());
    }
}
