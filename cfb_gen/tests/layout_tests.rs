use cfb_gen::layout::{pad_struct, FieldCategory, LayoutResolver, Namespace, TrailingPadding};
use cfb_gen::LayoutError;
use cfb_schema::Schema;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn load(name: &str) -> Schema {
    cfb_schema::load(fixture(name)).expect("load fixture")
}

#[test]
fn test_every_struct_reproduces_declared_offsets() {
    let schema = load("monster.json");
    let resolver = LayoutResolver::new(&schema);

    for object in schema.objects.iter().filter(|o| o.is_struct) {
        let layout = pad_struct(&resolver, object, TrailingPadding::ToByteSize).expect("pad struct");
        let mut position = 0u64;
        for padded in &layout.fields {
            position += padded.fillers.iter().map(|f| f.width.bytes()).sum::<u64>();
            assert_eq!(position, u64::from(padded.field.offset), "{}.{}", object.name, padded.field.name);
            position += resolver.size_of(padded.field).unwrap();
        }
        position += layout.trailing.iter().map(|f| f.width.bytes()).sum::<u64>();
        assert_eq!(position, object.byte_size(), "{}", object.name);

        let again = pad_struct(&resolver, object, TrailingPadding::ToByteSize).unwrap();
        assert_eq!(layout, again);
    }
}

#[test]
fn test_vec3_fillers_sit_before_z() {
    let schema = load("monster.json");
    let resolver = LayoutResolver::new(&schema);
    let vec3 = schema.object_named("example.Vec3").unwrap();

    let layout = pad_struct(&resolver, vec3, TrailingPadding::None).unwrap();
    let names: Vec<&str> = layout.fields.iter().map(|p| p.field.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y", "kind", "z"]);

    let z = &layout.fields[3];
    let widths: Vec<u64> = z.fillers.iter().map(|f| f.width.bytes()).collect();
    assert_eq!(widths, vec![2, 4]);
    assert_eq!(z.fillers[0].name(), "padding0_");
    assert_eq!(z.fillers[1].name(), "padding1_");
}

#[test]
fn test_player_field_categories() {
    let schema = load("monster.json");
    let resolver = LayoutResolver::new(&schema);
    let player = schema.object_named("example.Player").unwrap();

    let category = |name: &str| resolver.category(player.field(name).unwrap()).unwrap();
    assert_eq!(category("alive"), FieldCategory::Scalar);
    assert_eq!(category("color"), FieldCategory::Enum);
    assert_eq!(category("friends"), FieldCategory::TableVector);
    assert_eq!(category("lines"), FieldCategory::StringVector);
    assert_eq!(category("name"), FieldCategory::String);
    assert_eq!(category("pos"), FieldCategory::Struct);
    assert_eq!(category("role"), FieldCategory::Union);
    assert_eq!(category("role_type"), FieldCategory::UnionTag);
    assert_eq!(category("stats"), FieldCategory::StructVector);

    assert_eq!(resolver.default_of(player.field("color").unwrap()).unwrap(), "Color::Blue");
    assert_eq!(resolver.record_alignment(player).unwrap(), 8);
    for field in &player.fields {
        assert!(resolver.record_alignment(player).unwrap() >= resolver.alignment_of(field).unwrap());
    }
}

#[test]
fn test_player_write_order() {
    let schema = load("monster.json");
    let resolver = LayoutResolver::new(&schema);
    let player = schema.object_named("example.Player").unwrap();

    let order: Vec<&str> = resolver
        .fields_by_alignment(player)
        .unwrap()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(
        order,
        vec!["pos", "friends", "lines", "name", "old_score", "role", "stats", "alive", "color", "role_type"]
    );
}

#[test]
fn test_yaml_namespaces() {
    let schema = load("nested.yaml");
    let root = Namespace::build(&schema).unwrap();

    assert!(root.objects.is_empty() && root.enums.is_empty());
    let a = root.child("a").unwrap();
    assert!(a.objects.contains_key("Y"));
    let b = a.child("b").unwrap();
    assert!(b.objects.contains_key("X"));
    assert!(b.enums.contains_key("Shade"));

    let resolver = LayoutResolver::new(&schema);
    let y = schema.object_named("a.Y").unwrap();
    let shade = y.field("shade").unwrap();
    assert_eq!(resolver.type_name_in(shade, &a.path).unwrap(), "b::Shade");
    assert_eq!(resolver.presence_predicate_in(shade, &a.path, None).unwrap(), "self.shade != b::Shade::Dark");
}

#[test]
fn test_bad_offset_is_reported() {
    let schema = load("bad_offset.json");
    let resolver = LayoutResolver::new(&schema);
    let err = pad_struct(&resolver, &schema.objects[0], TrailingPadding::None).unwrap_err();
    assert!(matches!(err, LayoutError::OffsetMismatch { ref field, .. } if field == "b"));
}
