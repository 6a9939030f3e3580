use sidekick::agents::{AgentStore, VoiceKind, DEFAULT_PRESET_ID, PRESET_IDS};
use sidekick::persona::PersonaDraft;
use sidekick::shared::ids::AgentId;
use tempfile::tempdir;

#[test]
fn agents_roster_module_missing_file_seeds_presets() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("agents.yaml");

    let store = AgentStore::load(&path).expect("load fresh roster");
    let ids: Vec<&str> = store.agents().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, PRESET_IDS.to_vec());
    assert!(store.current().is_none());
}

#[test]
fn agents_roster_module_round_trips_custom_personas_and_current() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("agents.yaml");

    let mut store = AgentStore::load(&path).expect("load");
    let draft = PersonaDraft {
        name: "Sage".to_string(),
        personality: "Grounded and deliberate.".to_string(),
        voice: VoiceKind::Fenrir,
    };
    let profile = draft.into_profile(store.agents()).expect("commit draft");
    let id = profile.id.clone();
    store.upsert(profile);
    assert!(store.set_current(&id));
    store.save(&path).expect("save roster");

    let reloaded = AgentStore::load(&path).expect("reload");
    assert_eq!(reloaded.current().map(|a| a.name.as_str()), Some("Sage"));
    assert_eq!(
        reloaded.current().map(|a| a.voice),
        Some(VoiceKind::Fenrir)
    );
    assert_eq!(reloaded.agents().len(), PRESET_IDS.len() + 1);
}

#[test]
fn agents_roster_module_reseeds_presets_removed_from_the_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("agents.yaml");

    std::fs::write(
        &path,
        r#"
agents:
  - id: sage
    name: Sage
    personality: Grounded and deliberate.
    voice: fenrir
current: sage
"#,
    )
    .expect("write roster");

    let store = AgentStore::load(&path).expect("load");
    for preset in PRESET_IDS {
        assert!(
            store.agents().iter().any(|a| a.id.as_str() == preset),
            "preset `{preset}` should be re-seeded"
        );
    }
    assert_eq!(store.current().map(|a| a.id.as_str()), Some("sage"));
    assert_eq!(store.default_agent().id.as_str(), DEFAULT_PRESET_ID);
}

#[test]
fn agents_roster_module_drops_a_current_reference_to_an_unknown_agent() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("agents.yaml");

    std::fs::write(&path, "agents: []\ncurrent: ghost\n").expect("write roster");
    let store = AgentStore::load(&path).expect("load");
    assert!(store.current().is_none());
}

#[test]
fn agents_roster_module_preset_edits_survive_a_reload() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("agents.yaml");

    let mut store = AgentStore::load(&path).expect("load");
    let nova = AgentId::parse(DEFAULT_PRESET_ID).expect("id");
    store.set_current(&nova);
    let mut edited = store.default_agent().clone();
    edited.personality = "Rewritten personality.".to_string();
    assert!(store.update_current(edited));
    store.save(&path).expect("save");

    let reloaded = AgentStore::load(&path).expect("reload");
    assert_eq!(
        reloaded.default_agent().personality,
        "Rewritten personality."
    );
}
