use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use chrono::NaiveDate;
use registrar_core::{SectionId, StaffId, StudentId};
use registrar_infra::entity_store::InMemoryEntityStore;
use registrar_infra::membership::MembershipManager;
use registrar_infra::workflow::CertificateWorkflow;
use registrar_notify::{MailSettings, NotificationDispatcher, NullMailer};
use registrar_records::{StaffProfile, StudentProfile};

fn staff_profile(n: u64) -> StaffProfile {
    StaffProfile {
        name: format!("Staff {n}"),
        designation: "Assistant Professor".to_string(),
        department: "CSE".to_string(),
        campus: "Main".to_string(),
        phone_number: 9_000_000_000 + n,
        email: format!("staff{n}@univ.edu"),
    }
}

fn student_profile(n: u64) -> StudentProfile {
    StudentProfile {
        register_number: 810_000_000_000 + n,
        name: format!("Student {n}"),
        date_of_birth: NaiveDate::from_ymd_opt(2003, 6, 14).unwrap(),
        degree: "B.Tech".to_string(),
        department: "IT".to_string(),
        batch: "2021".to_string(),
        campus: "Main".to_string(),
        phone_number: 8_000_000_000 + n,
        email: format!("student{n}@univ.edu"),
    }
}

fn settings() -> MailSettings {
    MailSettings {
        from: "\"Registrar\" records@univ.edu".to_string(),
        site_url: "https://records.univ.edu".to_string(),
    }
}

fn setup_manager() -> (
    MembershipManager<Arc<InMemoryEntityStore>>,
    SectionId,
    StaffId,
    StudentId,
) {
    let store = Arc::new(InMemoryEntityStore::new());
    let manager = MembershipManager::new(store);
    let section = manager.create_section("Bench Section").unwrap();
    let staff = manager.create_staff(staff_profile(0)).unwrap();
    let student = manager.create_student(student_profile(0)).unwrap();
    (manager, section.id, staff.body.id, student.body.id)
}

fn bench_assign_release_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership");
    group.throughput(Throughput::Elements(2));

    group.bench_function("assign_release_staff", |b| {
        let (manager, section_id, staff_id, _) = setup_manager();
        b.iter(|| {
            manager
                .assign_staff(black_box(section_id), black_box(staff_id))
                .unwrap();
            manager.release_staff(section_id, staff_id).unwrap();
        });
    });

    group.bench_function("assign_release_student", |b| {
        let (manager, section_id, staff_id, student_id) = setup_manager();
        manager.assign_staff(section_id, staff_id).unwrap();
        b.iter(|| {
            manager
                .assign_student(black_box(section_id), black_box(student_id))
                .unwrap();
            manager.release_student(section_id, student_id).unwrap();
        });
    });

    group.finish();
}

fn bench_section_snapshot(c: &mut Criterion) {
    let (manager, section_id, staff_id, _) = setup_manager();
    manager.assign_staff(section_id, staff_id).unwrap();
    for n in 1..=50 {
        let student = manager.create_student(student_profile(n)).unwrap();
        manager.assign_student(section_id, student.body.id).unwrap();
    }

    c.bench_function("section_snapshot_50_students", |b| {
        b.iter(|| manager.section(black_box(section_id)).unwrap());
    });
}

fn bench_certificate_apply(c: &mut Criterion) {
    let store = Arc::new(InMemoryEntityStore::new());
    let manager = MembershipManager::new(store.clone());
    let workflow =
        CertificateWorkflow::new(store, NotificationDispatcher::new(NullMailer, settings()));

    let section = manager.create_section("Bench Section").unwrap();
    let staff = manager.create_staff(staff_profile(0)).unwrap();
    let student = manager.create_student(student_profile(0)).unwrap();
    manager.assign_staff(section.id, staff.body.id).unwrap();
    manager.assign_student(section.id, student.body.id).unwrap();
    let student_id = student.body.id;

    c.bench_function("certificate_apply", |b| {
        b.iter(|| workflow.apply(black_box(student_id)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_assign_release_cycle,
    bench_section_snapshot,
    bench_certificate_apply
);
criterion_main!(benches);
