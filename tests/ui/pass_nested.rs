use std::collections::BTreeMap;

use layerconf::{Configurable, FieldKind, FieldType};

#[derive(Debug, Default, Configurable)]
#[config(rename_all = "camelCase")]
struct Endpoint {
    base_url: String,
    r#type: String,
}

#[derive(Debug, Default, Configurable)]
struct Services {
    primary: Endpoint,
    replicas: Vec<Endpoint>,
    by_region: BTreeMap<String, Endpoint>,
}

#[derive(Debug, Default, Configurable)]
struct Empty {}

fn main() {
    let fields = Services::describe();
    match &fields[0].kind {
        FieldKind::Struct(inner) => {
            assert_eq!(inner[0].name, "baseUrl");
            assert_eq!(inner[1].name, "type");
        }
        other => panic!("unexpected kind {other:?}"),
    }
    assert!(matches!(&fields[1].kind, FieldKind::Seq(inner) if matches!(**inner, FieldKind::Struct(_))));
    assert!(matches!(Services::kind(), FieldKind::Struct(_)));
    assert!(Empty::describe().is_empty());
}
