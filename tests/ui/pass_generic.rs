use std::collections::HashMap;

use layerconf::{Configurable, FieldType, Populator};

#[derive(Debug, Default, Configurable)]
struct Wrapper<T: FieldType + Default> {
    value: T,
    label: String,
}

fn main() {
    let values = HashMap::from([
        ("value".to_string(), "7".to_string()),
        ("label".to_string(), "seven".to_string()),
    ]);
    let mut wrapper: Wrapper<u8> = Wrapper::default();
    Populator::new(&values).populate(&mut wrapper).unwrap();
    assert_eq!(wrapper.value, 7);
    assert_eq!(wrapper.label, "seven");
}
