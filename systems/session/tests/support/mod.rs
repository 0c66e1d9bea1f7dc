use roomcrawl_core::{RoomTemplate, TemplatePool};
use roomcrawl_system_generation::Config;
use roomcrawl_system_session::SessionConfig;

const LEVELS: [(&str, &str); 13] = [
    ("start", include_str!("../../../../levels/start.txt")),
    ("boss_room", include_str!("../../../../levels/boss_room.txt")),
    ("artifact_room", include_str!("../../../../levels/artifact_room.txt")),
    ("shop", include_str!("../../../../levels/shop.txt")),
    ("crossroads", include_str!("../../../../levels/crossroads.txt")),
    ("pillars", include_str!("../../../../levels/pillars.txt")),
    ("corridor_ns", include_str!("../../../../levels/corridor_ns.txt")),
    ("corridor_we", include_str!("../../../../levels/corridor_we.txt")),
    ("pit", include_str!("../../../../levels/pit.txt")),
    ("garden", include_str!("../../../../levels/garden.txt")),
    ("corner_ne", include_str!("../../../../levels/corner_ne.txt")),
    ("corner_sw", include_str!("../../../../levels/corner_sw.txt")),
    ("storeroom", include_str!("../../../../levels/storeroom.txt")),
];

pub fn pool() -> TemplatePool {
    let templates = LEVELS.iter().map(|(name, source)| {
        RoomTemplate::parse(*name, source).unwrap_or_else(|error| panic!("{error}"))
    });
    TemplatePool::from_templates(templates).expect("shipped levels form a complete pool")
}

pub fn config(seed: u64) -> SessionConfig {
    SessionConfig {
        generation: Config::new(5),
        seed,
        ..SessionConfig::default()
    }
}
