mod common;

use chrono::NaiveDate;
use common::{Call, FixedPicker, FixedSaver, MockPort, supplier};
use pretty_assertions::assert_eq;
use std::{fs, rc::Rc, time::Duration};
use supplier_sync::{
    CommitSummary, EditPermission, FilePicker, FileSaver, ImportBatch, NoticeLevel,
    ReferenceKind, RemoteCommandPort, SupplierField, SupplierSession, SyncConfig,
};
use tokio::{task::LocalSet, time::sleep};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn store() -> Rc<MockPort> {
    MockPort::with_suppliers(vec![
        supplier("1", "Acme Parts"),
        supplier("2", "Acme Tools"),
        supplier("3", "Acme Logistics"),
        supplier("4", "Globex"),
    ])
}

fn session_with(port: &Rc<MockPort>, saver: FixedSaver, config: &SyncConfig) -> SupplierSession {
    let dyn_port: Rc<dyn RemoteCommandPort> = port.clone();
    let saver: Rc<dyn FileSaver> = Rc::new(saver);
    SupplierSession::new(dyn_port, saver, EditPermission::new(true).gate(), config)
}

fn session(port: &Rc<MockPort>) -> SupplierSession {
    session_with(port, FixedSaver::default(), &SyncConfig::default())
}

#[tokio::test(start_paused = true)]
async fn search_then_edit_saves_one_whole_record() {
    LocalSet::new()
        .run_until(async {
            let port = store();
            let session = session(&port);

            session.on_query_change("acme");
            sleep(ms(400)).await;
            let names: Vec<String> = session.suppliers().into_iter().map(|s| s.name).collect();
            assert_eq!(names, vec!["Acme Parts", "Acme Tools", "Acme Logistics"]);

            session
                .on_field_edit("1", SupplierField::Status, "Act")
                .expect("first edit");
            assert!(session.field_sync().is_busy("1"));
            sleep(ms(200)).await;
            session
                .on_field_edit("1", SupplierField::Status, "Active")
                .expect("second edit");

            sleep(ms(900)).await;
            assert!(port.upserts().is_empty());
            assert!(session.field_sync().is_busy("1"));

            sleep(ms(200)).await;
            let upserts = port.upserts();
            assert_eq!(upserts.len(), 1);
            assert_eq!(upserts[0].supplier_id, "1");
            assert_eq!(upserts[0].supplier_name, "Acme Parts");
            assert_eq!(upserts[0].supplier_status, "Active");
            assert_eq!(upserts[0].country, "BR");
            assert!(!session.field_sync().is_busy("1"));
            assert!(session.drain_notices().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn new_search_drops_edits_for_rows_that_left_the_view() {
    LocalSet::new()
        .run_until(async {
            let port = store();
            let session = session(&port);

            session.on_query_change("acme");
            sleep(ms(400)).await;
            session
                .on_field_edit("2", SupplierField::Planner, "Ana")
                .expect("edit");

            session.on_query_change("globex");
            sleep(ms(400)).await;
            assert!(session.supplier("2").is_none());
            assert!(session.field_sync().pending_edits("2").is_empty());

            sleep(ms(1000)).await;
            assert!(port.upserts().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn refreshed_results_keep_unsent_edits() {
    LocalSet::new()
        .run_until(async {
            let port = store();
            let session = session(&port);

            session.on_query_change("acme");
            sleep(ms(400)).await;
            session
                .on_field_edit("1", SupplierField::Status, "Paused")
                .expect("edit");

            assert!(session.refresh().await);
            assert_eq!(session.supplier("1").expect("row").supplier_status, "Paused");

            sleep(ms(1100)).await;
            assert_eq!(port.upserts()[0].supplier_status, "Paused");
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn closing_the_surface_cancels_pending_saves() {
    LocalSet::new()
        .run_until(async {
            let port = store();
            let session = session(&port);

            session.on_query_change("acme");
            sleep(ms(400)).await;
            session
                .on_field_edit("1", SupplierField::Status, "Active")
                .expect("edit");
            session.on_query_change("globex");
            session.close();

            sleep(ms(2000)).await;
            assert!(port.upserts().is_empty());
            assert_eq!(port.searches(), vec!["acme".to_string()]);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn closing_with_unsent_edits_reports_them_as_unsaved() {
    LocalSet::new()
        .run_until(async {
            let port = store();
            let session = session(&port);

            session.on_query_change("acme");
            sleep(ms(400)).await;
            session
                .on_field_edit("1", SupplierField::Status, "Active")
                .expect("edit");
            session.close();

            sleep(ms(5000)).await;
            assert!(port.upserts().is_empty());
            assert!(!session.field_sync().is_busy("1"));
            assert_eq!(session.field_sync().unsaved_ids(), vec!["1".to_string()]);

            // The view falls back to what the store holds.
            assert!(session.refresh().await);
            assert_eq!(session.supplier("1").expect("row").supplier_status, "");
            assert_eq!(port.stored("1").expect("stored").supplier_status, "");
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn settle_windows_come_from_the_config() {
    LocalSet::new()
        .run_until(async {
            let port = store();
            let config =
                SyncConfig::parse_json5("{ search_settle_ms: 50, save_settle_ms: 200 }")
                    .expect("config");
            let session = session_with(&port, FixedSaver::default(), &config);

            session.on_query_change("acme");
            sleep(ms(60)).await;
            assert_eq!(session.suppliers().len(), 3);

            session
                .on_field_edit("1", SupplierField::Status, "Active")
                .expect("edit");
            sleep(ms(250)).await;
            assert_eq!(port.upserts().len(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn activation_loads_reference_lists_and_tolerates_failures() {
    LocalSet::new()
        .run_until(async {
            let port = store();
            port.failing_lists.borrow_mut().push(ReferenceKind::Sqie);
            let mut session = session(&port);

            let lists = session.activate().await;
            let planners: Vec<&str> = lists.names(ReferenceKind::Planner).collect();
            assert_eq!(planners, vec!["Ana", "Bruno"]);
            assert_eq!(
                lists
                    .lookup(ReferenceKind::Planner, "Ana")
                    .map(|e| e.email.as_str()),
                Some("ana@corp.com")
            );
            assert!(lists.entries(ReferenceKind::Sqie).is_empty());
            assert_eq!(lists.entries(ReferenceKind::Category).len(), 1);

            let fetched = port.count(|c| matches!(c, Call::FetchReferenceList(_)));
            assert_eq!(fetched, 6);
            assert!(session.drain_notices().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn committed_import_refreshes_the_current_search() {
    LocalSet::new()
        .run_until(async {
            let port = store();
            port.commit_result
                .replace(Some(Ok(CommitSummary::new(1, 1, 0))));
            let session = session(&port);

            session.on_query_change("acme");
            sleep(ms(400)).await;

            let picker: Rc<dyn FilePicker> = Rc::new(FixedPicker(None));
            let mut pipeline = session.import_pipeline(picker);
            pipeline.load(ImportBatch::from_bytes(b"workbook _control".to_vec()));
            pipeline.validate().await.expect("validate");

            // Stand-in for the row the import inserted.
            port.store.borrow_mut().push(supplier("5", "Acme Imported"));
            let summary = session
                .commit_import(&mut pipeline)
                .await
                .expect("commit");
            assert_eq!(summary.inserted, 1);

            assert_eq!(port.searches(), vec!["acme".to_string(), "acme".to_string()]);
            assert_eq!(session.suppliers().len(), 4);

            let notices = session.drain_notices();
            assert_eq!(notices.len(), 1);
            assert_eq!(notices[0].level, NoticeLevel::Success);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn export_writes_the_store_bytes_to_the_chosen_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let target = dir.path().join("out.xlsx");
    let today = NaiveDate::from_ymd_opt(2026, 10, 17).expect("date");

    LocalSet::new()
        .run_until(async {
            let port = store();
            port.export_bytes.replace(b"PK\x03\x04export".to_vec());
            let saver = FixedSaver {
                path: Some(target.clone()),
                ..Default::default()
            };
            let session = session_with(&port, saver, &SyncConfig::default());

            let written = session.export_all(today).await?;
            assert_eq!(written.as_deref(), Some(target.as_path()));
            assert_eq!(fs::read(&target)?, b"PK\x03\x04export".to_vec());

            let notices = session.drain_notices();
            assert_eq!(notices.len(), 1);
            assert_eq!(notices[0].level, NoticeLevel::Success);
            Ok::<(), anyhow::Error>(())
        })
        .await
}

#[tokio::test]
async fn cancelled_export_writes_nothing() {
    let port = store();
    let saver = Rc::new(FixedSaver::default());
    let dyn_port: Rc<dyn RemoteCommandPort> = port.clone();
    let dyn_saver: Rc<dyn FileSaver> = saver.clone();
    let session = SupplierSession::new(
        dyn_port,
        dyn_saver,
        EditPermission::new(true).gate(),
        &SyncConfig::default(),
    );

    let today = NaiveDate::from_ymd_opt(2026, 10, 17).expect("date");
    assert_eq!(session.export_all(today).await.expect("export"), None);
    assert_eq!(
        saver.suggested.borrow().clone(),
        vec!["suppliers_2026-10-17.xlsx".to_string()]
    );
    assert!(session.drain_notices().is_empty());
}
