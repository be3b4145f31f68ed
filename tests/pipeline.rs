//! End-to-end screen builds against the recording factory and an in-memory
//! store.

use settings_panel::app::{ScreenPhase, SettingsScreen};
use settings_panel::binding::{ActionContext, ActionRegistry};
use settings_panel::config::{PanelOptions, Viewport};
use settings_panel::schema::DirectorySource;
use settings_panel::store::{MemoryStore, SettingsStore, StorePath, Value};
use settings_panel::ui::{ElementFactory, RecordingFactory};
use settings_panel::PanelError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

const SCHEMA: &str = r#"
<settings>
    <done>
        <action>close(o)</action>
    </done>
    <row type="link" text="Account" rule="profile.signedIn"/>
    <row type="bool" text="Music" property="audio.music"/>
    <row type="bool" text="Vibration" property="device.vibrate">
        <rule>return device.hasVibrator &amp;&amp; !audio.music;</rule>
    </row>
    <row type="link" text="Credits" action="credits.seen = true; open(o, 'credits')"/>
</settings>
"#;

type CallLog = Rc<RefCell<Vec<(String, Vec<Value>)>>>;

fn path(s: &str) -> StorePath {
    s.parse().unwrap()
}

fn store() -> MemoryStore {
    MemoryStore::from_json(
        r#"{
            "profile": {"signedIn": false},
            "audio": {"music": false},
            "device": {"vibrate": true, "hasVibrator": true},
            "credits": {"seen": false}
        }"#,
    )
    .unwrap()
}

fn registry(log: &CallLog) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    for name in ["close", "open"] {
        let log = Rc::clone(log);
        registry.register(name, move |ctx: &mut ActionContext<'_>| {
            log.borrow_mut().push((name.to_string(), ctx.args.to_vec()));
            Ok(())
        });
    }
    registry
}

struct Harness {
    screen: SettingsScreen,
    factory: RecordingFactory,
    store: MemoryStore,
    log: CallLog,
    report: settings_panel::BuildReport,
}

impl Harness {
    fn build(schema: &str, store: MemoryStore) -> Self {
        let log = CallLog::default();
        let mut factory = RecordingFactory::new()
            .with_image_size("switchOn", 80.0, 40.0)
            .with_image_size("switchOff", 80.0, 40.0);
        let mut screen = SettingsScreen::new();
        screen
            .configure(
                &PanelOptions::with_schema("settings"),
                &Viewport::new(400.0, 500.0, 1.0),
            )
            .unwrap();
        let schemas = HashMap::from([("settings".to_string(), schema.to_string())]);
        let report = screen
            .build(&schemas, &mut factory, &store, &registry(&log))
            .unwrap();
        Self {
            screen,
            factory,
            store,
            log,
            report,
        }
    }

    fn click(&mut self, label: &str) -> settings_panel::Interaction {
        let label = self.factory.find_label(label).unwrap().id;
        let control = self.report.control_for_label(label).unwrap();
        self.screen
            .interact(control, &mut self.factory, &mut self.store)
            .unwrap()
    }

    fn image_of(&self, label: &str) -> Option<String> {
        let label = self.factory.find_label(label)?.id;
        let control = self.report.control_for_label(label)?;
        self.factory.element(control)?.image.clone()
    }
}

#[test]
fn rows_compact_around_hidden_rows() {
    let harness = Harness::build(SCHEMA, store());
    let multipliers: Vec<_> = harness.report.rows.iter().map(|r| r.multiplier).collect();

    // Account hidden (not signed in); Vibration visible (music off)
    assert_eq!(multipliers, vec![None, Some(1.5), Some(3.0), Some(4.5)]);
    assert!(harness.report.diagnostics.is_empty());
    assert!(harness.factory.find_label("Account").is_none());

    // row slot y = 50, label centred half a slot below the tile top
    let music = harness.factory.find_label("Music").unwrap();
    assert_eq!(music.geometry.y, 50.0 * 1.5 + 25.0);
    let credits = harness.factory.find_label("Credits").unwrap();
    assert_eq!(credits.geometry.y, 50.0 * 4.5 + 25.0);
}

#[test]
fn toggle_round_trip() {
    let mut harness = Harness::build(SCHEMA, store());
    assert_eq!(harness.image_of("Music").as_deref(), Some("switchOff"));

    let first = harness.click("Music");
    assert_eq!(first.toggled, Some(true));
    assert!(first.diagnostics.is_empty());
    assert_eq!(harness.store.read(&path("audio.music")), Some(Value::Bool(true)));
    assert_eq!(harness.image_of("Music").as_deref(), Some("switchOn"));

    let second = harness.click("Music");
    assert_eq!(second.toggled, Some(false));
    assert_eq!(harness.store.read(&path("audio.music")), Some(Value::Bool(false)));
    assert_eq!(harness.image_of("Music").as_deref(), Some("switchOff"));
}

#[test]
fn interactions_do_not_reevaluate_rules() {
    let mut harness = Harness::build(SCHEMA, store());
    harness.click("Music");

    // Vibration's rule now evaluates false, but the built screen is unchanged
    assert!(harness.factory.find_label("Vibration").is_some());
    assert_eq!(harness.report.rows[2].multiplier, Some(3.0));
}

#[test]
fn toggles_are_pinned_to_the_right_edge() {
    let harness = Harness::build(SCHEMA, store());
    for label in ["Music", "Vibration"] {
        let label = harness.factory.find_label(label).unwrap();
        let toggle = harness.report.control_for_label(label.id).unwrap();
        let geometry = harness.factory.geometry(toggle).unwrap();
        assert_eq!(geometry.x, 400.0 - 80.0 - 20.0);
        assert_eq!(geometry.y, label.geometry.y);
    }
}

#[test]
fn link_runs_script_with_element() {
    let mut harness = Harness::build(SCHEMA, store());
    let interaction = harness.click("Credits");

    assert!(interaction.diagnostics.is_empty());
    assert_eq!(harness.store.read(&path("credits.seen")), Some(Value::Bool(true)));
    assert_eq!(
        harness.log.borrow().as_slice(),
        &[(
            "open".to_string(),
            vec![Value::Element(interaction.element), Value::from("credits")]
        )]
    );
}

#[test]
fn done_action_comes_from_the_screen_document() {
    let mut harness = Harness::build(SCHEMA, store());
    let interaction = harness.click("Done");

    assert_eq!(interaction.row, None);
    assert_eq!(
        harness.log.borrow().as_slice(),
        &[("close".to_string(), vec![Value::Element(interaction.element)])]
    );

    let label = harness.factory.find_label("Done").unwrap();
    assert_eq!(label.tint, Some(harness.screen.layout().unwrap().link_tint));
    // "Done" at font size 25 measures 50
    assert_eq!(label.geometry.x, 400.0 - 50.0 - 20.0);
}

#[test]
fn screen_without_done_node_has_inert_done_control() {
    let mut harness = Harness::build(
        r#"<settings><row type="link" text="About"/></settings>"#,
        store(),
    );
    let interaction = harness.click("Done");
    assert!(interaction.diagnostics.is_empty());
    assert!(harness.log.borrow().is_empty());
}

#[test]
fn bad_rule_hides_row_and_build_completes() {
    let schema = r#"
        <settings>
            <row type="link" text="Broken" rule="profile.signedIn ||"/>
            <row type="bool" text="Music" property="audio.music"/>
        </settings>"#;
    let harness = Harness::build(schema, store());

    assert_eq!(harness.screen.phase(), ScreenPhase::Built);
    assert_eq!(harness.report.rows[0].multiplier, None);
    assert_eq!(harness.report.rows[1].multiplier, Some(1.5));
    assert_eq!(harness.report.diagnostics.len(), 1);
    assert!(matches!(
        harness.report.diagnostics[0],
        PanelError::Evaluation { row: Some(0), field: "rule", .. }
    ));
}

#[test]
fn broken_bindings_become_reported_no_ops() {
    let schema = r#"
        <settings>
            <row type="bool" text="Volume" property="audio.volume"/>
            <row type="link" text="Help" action="launch('help')"/>
        </settings>"#;
    let mut store = store();
    store.insert("audio.volume", 0.8).unwrap();
    let mut harness = Harness::build(schema, store);

    // non-bool property and unknown action are both reported at build time
    assert_eq!(harness.report.diagnostics.len(), 2);
    assert_eq!(harness.image_of("Volume").as_deref(), Some("switchOff"));

    let volume = harness.click("Volume");
    assert_eq!(volume.toggled, None);
    assert_eq!(volume.diagnostics.len(), 1);
    assert_eq!(harness.store.read(&path("audio.volume")), Some(Value::Number(0.8)));

    let help = harness.click("Help");
    assert!(help.diagnostics.is_empty());
    assert!(harness.log.borrow().is_empty());
}

#[test]
fn teardown_releases_everything_once() {
    let mut harness = Harness::build(SCHEMA, store());
    let created = harness.screen.elements().len();
    assert_eq!(created, harness.factory.elements().len());

    harness.screen.teardown(&mut harness.factory).unwrap();
    assert!(harness.factory.elements().is_empty());
    assert_eq!(harness.factory.destroyed().len(), created);

    let err = harness.screen.teardown(&mut harness.factory).unwrap_err();
    assert!(matches!(err, PanelError::InvalidState { .. }));
    let err = harness
        .screen
        .interact(harness.report.header.done_button, &mut harness.factory, &mut harness.store)
        .unwrap_err();
    assert!(matches!(err, PanelError::InvalidState { .. }));
}

#[test]
fn schemas_load_from_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("audio.xml"), SCHEMA).unwrap();
    let source = DirectorySource::new(dir.path());

    let mut factory = RecordingFactory::new();
    let mut screen = SettingsScreen::new();
    screen
        .configure(&PanelOptions::with_schema("audio"), &Viewport::default())
        .unwrap();
    let report = screen
        .build(&source, &mut factory, &store(), &registry(&CallLog::default()))
        .unwrap();
    assert_eq!(report.visible_rows().count(), 3);
}
