use std::collections::HashMap;

/// Built-in reference documents keyed by name, each a YAML catalog fragment.
pub fn builtin_documents() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("classes", include_str!("../content/classes.yaml")),
        ("spells", include_str!("../content/spells.yaml")),
        ("heroic_skills", include_str!("../content/heroic_skills.yaml")),
        ("special", include_str!("../content/special.yaml")),
        ("items", include_str!("../content/items.yaml")),
    ])
}
