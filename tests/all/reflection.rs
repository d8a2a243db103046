use service_bus_common::reflection::{
    instantiate_without_constructor, invoke_method, read_field, write_field, Arguments, Reflect,
    Reflection, ReflectionError, TypeCatalog,
};

#[derive(Debug, Clone, PartialEq)]
struct FirstClass {
    first_class_value: String,
    shared: u32,
}

impl FirstClass {
    fn private_method(&self, suffix: &str) -> String {
        format!("{}{}", self.first_class_value, suffix)
    }
}

impl Reflect for FirstClass {
    fn reflection() -> Reflection<Self> {
        Reflection::<Self>::new()
            .field("first_class_value", |o| &o.first_class_value, |o| {
                &mut o.first_class_value
            })
            .field("shared", |o| &o.shared, |o| &mut o.shared)
            .method("private_method", |o, mut arguments| {
                let suffix: String = arguments.take(0)?;
                Ok(Box::new(o.private_method(&suffix)))
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SecondClass {
    parent: FirstClass,
    second_class_value: String,
    shared: u32,
}

impl Reflect for SecondClass {
    fn reflection() -> Reflection<Self> {
        Reflection::<Self>::new()
            .field("second_class_value", |o| &o.second_class_value, |o| {
                &mut o.second_class_value
            })
            .field("shared", |o| &o.shared, |o| &mut o.shared)
            .extends(|o| &o.parent, |o| &mut o.parent)
    }
}

#[derive(Debug, PartialEq)]
struct WithClosedConstructor {
    value: Option<String>,
}

impl WithClosedConstructor {
    #[allow(dead_code)]
    fn create(value: &str) -> Self {
        Self {
            value: Some(value.to_owned()),
        }
    }
}

impl Reflect for WithClosedConstructor {
    fn reflection() -> Reflection<Self> {
        Reflection::<Self>::new()
            .field("value", |o| &o.value, |o| &mut o.value)
            .blank(|| WithClosedConstructor { value: None })
    }
}

fn second_class() -> SecondClass {
    SecondClass {
        parent: FirstClass {
            first_class_value: "abube".into(),
            shared: 1,
        },
        second_class_value: "qwerty".into(),
        shared: 2,
    }
}

#[test]
fn a_field_declared_on_an_ancestor_can_be_read() {
    let object = second_class();

    let value: String = read_field(&object, "first_class_value").unwrap();

    assert_eq!(value, "abube");
}

#[test]
fn the_nearest_declaration_of_a_field_wins() {
    let object = second_class();

    let value: u32 = read_field(&object, "shared").unwrap();

    assert_eq!(value, 2);
}

#[test]
fn fields_can_be_written_through_the_ancestor_chain() {
    let mut object = second_class();

    write_field(&mut object, "first_class_value", String::from("updated")).unwrap();
    write_field(&mut object, "second_class_value", String::from("also updated")).unwrap();

    assert_eq!(object.parent.first_class_value, "updated");
    assert_eq!(object.second_class_value, "also updated");
}

#[test]
fn writing_an_unknown_field_fails() {
    let mut object = second_class();

    let error = write_field(&mut object, "qwerty", String::from("value")).unwrap_err();

    assert!(matches!(
        error,
        ReflectionError::UnknownField { ref field, .. } if field == "qwerty"
    ));
    assert_eq!(object, second_class());
}

#[test]
fn writing_a_field_with_the_wrong_type_leaves_the_object_untouched() {
    let mut object = second_class();

    let error = write_field(&mut object, "second_class_value", 42_u64).unwrap_err();

    assert!(matches!(
        error,
        ReflectionError::FieldTypeMismatch { ref field, expected, .. }
            if field == "second_class_value" && expected == "u64"
    ));
    assert_eq!(object, second_class());
}

#[test]
fn reading_an_unknown_field_fails() {
    let object = second_class();

    let error = read_field::<_, String>(&object, "qwerty").unwrap_err();

    assert!(matches!(
        error,
        ReflectionError::UnknownField { ref field, .. } if field == "qwerty"
    ));
}

#[test]
fn reading_a_field_with_the_wrong_type_fails() {
    let object = second_class();

    let error = read_field::<_, u64>(&object, "second_class_value").unwrap_err();

    assert!(matches!(error, ReflectionError::FieldTypeMismatch { .. }));
}

#[test]
fn methods_declared_on_an_ancestor_can_be_invoked() {
    let mut object = second_class();

    let output = invoke_method(
        &mut object,
        "private_method",
        Arguments::new().with(String::from("!")),
    )
    .unwrap();

    assert_eq!(output.downcast_ref::<String>().map(String::as_str), Some("abube!"));
}

#[test]
fn invoking_an_unknown_method_fails() {
    let mut object = second_class();

    let error = invoke_method(&mut object, "not_exists", Arguments::new()).unwrap_err();

    assert!(matches!(
        error,
        ReflectionError::ReflectionInvocationFailed { ref method, .. } if method == "not_exists"
    ));
}

#[test]
fn invoking_a_method_with_bad_arguments_fails() {
    let mut object = second_class();

    let error = invoke_method(&mut object, "private_method", Arguments::new().with(42_u8))
        .unwrap_err();

    assert!(matches!(
        error,
        ReflectionError::ReflectionInvocationFailed { .. }
    ));
}

#[test]
fn a_type_can_be_built_without_its_constructor() {
    let object = instantiate_without_constructor::<WithClosedConstructor>().unwrap();

    assert_eq!(object, WithClosedConstructor { value: None });
}

#[test]
fn a_registered_type_can_be_built_by_name() {
    let mut catalog = TypeCatalog::new();
    catalog.register_reflect::<WithClosedConstructor>();

    let object = catalog
        .instantiate_without_constructor("WithClosedConstructor")
        .unwrap();

    assert_eq!(
        object.downcast_ref::<WithClosedConstructor>(),
        Some(&WithClosedConstructor { value: None })
    );
}

#[test]
fn building_an_unknown_type_fails() {
    let mut catalog = TypeCatalog::new();
    catalog.register_reflect::<WithClosedConstructor>();
    catalog.register_reflect::<FirstClass>();

    let unknown = catalog.instantiate_without_constructor("SomeUnknownClass");
    let no_blank = catalog.instantiate_without_constructor("FirstClass");
    let unregistered = instantiate_without_constructor::<FirstClass>();

    assert!(matches!(unknown, Err(ReflectionError::TypeNotFound(ref name)) if name == "SomeUnknownClass"));
    assert!(matches!(no_blank, Err(ReflectionError::TypeNotFound(_))));
    assert!(matches!(unregistered, Err(ReflectionError::TypeNotFound(_))));
}
