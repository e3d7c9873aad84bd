//! Integration tests for the conversion service.
//!
//! These exercise registration, hierarchy lookup, caching, the null policy and
//! the default converters through the public API only.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use typeconv::prelude::*;
use typeconv::{ConversionServiceBuilder, defaults::DefaultConverterError};

#[derive(Clone, Copy)]
struct Zoo {
    pet: TypeHash,
    animal: TypeHash,
    dog: TypeHash,
    socket: TypeHash,
    currency: TypeHash,
    color: TypeHash,
}

/// Universe with `Dog : Animal, Pet`, two unrelated classes and a `Color` enum.
fn zoo() -> (TypeUniverse, Zoo) {
    let mut universe = TypeUniverse::with_builtins();
    let pet = universe.register(TypeEntry::interface("Pet")).unwrap();
    let animal = universe.register(TypeEntry::class("Animal")).unwrap();
    let dog = universe
        .register(TypeEntry::class("Dog").with_base(animal).with_interface(pet))
        .unwrap();
    let socket = universe.register(TypeEntry::class("Socket")).unwrap();
    let currency = universe.register(TypeEntry::class("Currency")).unwrap();
    let color = universe
        .register(
            TypeEntry::enumeration("Color")
                .with_member("Red")
                .with_member("Green")
                .with_member("Blue"),
        )
        .unwrap();
    let zoo = Zoo {
        pet,
        animal,
        dog,
        socket,
        currency,
        color,
    };
    (universe, zoo)
}

fn builder() -> (ConversionServiceBuilder, Zoo) {
    let (universe, zoo) = zoo();
    (ConversionService::builder().universe(universe), zoo)
}

fn service() -> (ConversionService, Zoo) {
    let (builder, zoo) = builder();
    (builder.build().unwrap(), zoo)
}

fn service_with_defaults() -> (ConversionService, Zoo) {
    let (builder, zoo) = builder();
    (builder.with_defaults().build().unwrap(), zoo)
}

fn text(value: &str) -> Option<Value> {
    Some(Value::new(String::from(value)))
}

fn labeled(label: &'static str) -> impl Converter {
    move |_: &Value| -> Result<Option<Value>, BoxError> { Ok(Some(Value::new(String::from(label)))) }
}

fn convert_text(service: &ConversionService, value: Value, target: TypeHash) -> String {
    service
        .convert(Some(value), target)
        .unwrap()
        .unwrap()
        .downcast::<String>()
        .unwrap()
}

// =============================================================================
// Bypass
// =============================================================================

#[test]
fn test_bypass_returns_same_value() {
    let (service, zoo) = service();
    let payload = Arc::new(String::from("Rex"));

    let first = service
        .convert(Some(Value::with_type(zoo.dog, Arc::clone(&payload))), zoo.animal)
        .unwrap()
        .unwrap();
    assert_eq!(first.type_hash(), zoo.dog);
    let first = first.downcast::<Arc<String>>().unwrap();
    assert!(Arc::ptr_eq(&first, &payload));

    let second = service
        .convert(Some(Value::with_type(zoo.dog, Arc::clone(&payload))), zoo.animal)
        .unwrap()
        .unwrap()
        .downcast::<Arc<String>>()
        .unwrap();
    assert!(Arc::ptr_eq(&second, &payload));
}

#[test]
fn test_can_bypass_convert() {
    let (service, zoo) = service_with_defaults();
    assert!(service.can_bypass_convert(Some(zoo.dog), zoo.animal));
    assert!(service.can_bypass_convert(Some(zoo.dog), builtins::OBJECT));
    assert!(service.can_bypass_convert(None, builtins::INT32));
    assert!(!service.can_bypass_convert(Some(builtins::STRING), builtins::INT32));
    assert!(!service.can_bypass_convert(Some(zoo.animal), zoo.dog));
}

#[test]
fn test_interface_bypass() {
    let (service, zoo) = service();
    assert!(service.can_convert(Some(zoo.dog), zoo.pet));
    assert!(!service.can_convert(Some(zoo.animal), zoo.pet));
}

// =============================================================================
// Cache correctness
// =============================================================================

#[test]
fn test_registered_converter_used_on_every_call() {
    let (service, zoo) = service();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    service
        .add_converter_for(
            zoo.socket,
            zoo.currency,
            move |_: &Value| -> Result<Option<Value>, BoxError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some(Value::with_type(zoo.currency, 0u64)))
            },
        )
        .unwrap();

    for _ in 0..3 {
        let out = service
            .convert(Some(Value::with_type(zoo.socket, ())), zoo.currency)
            .unwrap()
            .unwrap();
        assert_eq!(out.type_hash(), zoo.currency);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_unregister_invalidates_cache() {
    let (service, zoo) = service();
    service
        .add_converter_for(zoo.socket, zoo.currency, labeled("old"))
        .unwrap();
    assert!(service.can_convert(Some(zoo.socket), zoo.currency));
    assert!(service.cached_converters() > 0);

    assert!(service.remove_convertible(zoo.socket, zoo.currency));
    assert_eq!(service.cached_converters(), 0);
    assert!(!service.can_convert(Some(zoo.socket), zoo.currency));

    let err = service
        .convert(Some(Value::with_type(zoo.socket, ())), zoo.currency)
        .unwrap_err();
    assert!(err.is_converter_not_found());
}

#[test]
fn test_register_after_negative_lookup() {
    let (service, zoo) = service();
    assert!(!service.can_convert(Some(zoo.socket), zoo.currency));

    service
        .add_converter_for(zoo.socket, zoo.currency, labeled("new"))
        .unwrap();
    assert!(service.can_convert(Some(zoo.socket), zoo.currency));
}

// =============================================================================
// Hierarchy
// =============================================================================

#[test]
fn test_hierarchy_fallback() {
    let (service, zoo) = service();
    service
        .add_converter_for(zoo.animal, builtins::STRING, labeled("animal"))
        .unwrap();

    let rex = Value::with_type(zoo.dog, String::from("Rex"));
    assert_eq!(convert_text(&service, rex, builtins::STRING), "animal");
}

#[test]
fn test_specificity_ordering() {
    let (service, zoo) = service();
    service
        .add_converter_for(zoo.animal, builtins::STRING, labeled("animal"))
        .unwrap();
    service
        .add_converter_for(zoo.dog, builtins::STRING, labeled("dog"))
        .unwrap();

    let rex = Value::with_type(zoo.dog, String::from("Rex"));
    assert_eq!(convert_text(&service, rex, builtins::STRING), "dog");

    let generic = Value::with_type(zoo.animal, String::from("?"));
    assert_eq!(convert_text(&service, generic, builtins::STRING), "animal");
}

#[test]
fn test_interface_registration_reached_through_hierarchy() {
    let (service, zoo) = service();
    service
        .add_converter_for(zoo.pet, builtins::STRING, labeled("pet"))
        .unwrap();

    let rex = Value::with_type(zoo.dog, String::from("Rex"));
    assert_eq!(convert_text(&service, rex, builtins::STRING), "pet");
}

#[test]
fn test_override_by_reregistration() {
    let (service, zoo) = service();
    service
        .add_converter_for(zoo.socket, builtins::STRING, labeled("first"))
        .unwrap();
    let socket = || Value::with_type(zoo.socket, ());
    assert_eq!(convert_text(&service, socket(), builtins::STRING), "first");

    service
        .add_converter_for(zoo.socket, builtins::STRING, labeled("second"))
        .unwrap();
    assert_eq!(convert_text(&service, socket(), builtins::STRING), "second");
}

// =============================================================================
// Null handling
// =============================================================================

#[test]
fn test_null_to_primitive_fails() {
    let (service, _) = service_with_defaults();
    for target in [builtins::INT32, builtins::BOOL, builtins::DOUBLE] {
        let err = service.convert_to(None, target, None).unwrap_err();
        assert!(err.is_conversion_failed());
        let err = service
            .convert_to(None, target, Some(builtins::STRING))
            .unwrap_err();
        assert!(err.is_conversion_failed());
    }
}

#[test]
fn test_null_to_reference_is_quiet() {
    let (service, zoo) = service_with_defaults();
    assert!(service.convert(None, builtins::STRING).unwrap().is_none());
    assert!(service.convert_to(None, zoo.animal, Some(zoo.dog)).unwrap().is_none());
    assert!(
        service
            .convert_to(None, zoo.currency, Some(zoo.socket))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_null_to_optional_is_empty() {
    let mut universe = TypeUniverse::with_builtins();
    let maybe_text = universe.register_optional(builtins::STRING);
    let service = ConversionService::builder()
        .universe(universe)
        .build()
        .unwrap();

    let out = service.convert(None, maybe_text).unwrap().unwrap();
    assert_eq!(out.type_hash(), maybe_text);
    assert!(out.downcast::<Optional>().unwrap().is_empty());
}

#[test]
fn test_can_convert_null_source() {
    let (service, zoo) = service();
    assert!(service.can_convert(None, zoo.currency));
    assert!(service.can_convert(None, builtins::INT32));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_converter_not_found_names_both_types() {
    let (service, zoo) = service();
    let err = service
        .convert(Some(Value::with_type(zoo.socket, ())), zoo.currency)
        .unwrap_err();
    assert!(err.is_converter_not_found());
    match &err {
        ConversionError::ConverterNotFound {
            source_type,
            target_type,
        } => {
            assert_eq!(source_type, "Socket");
            assert_eq!(target_type, "Currency");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("[Socket]"));
    assert!(err.to_string().contains("[Currency]"));
}

#[test]
fn test_unconditional_global_rejected() {
    struct Everything;

    impl GenericConverter for Everything {
        fn convertible_types(&self) -> Option<Vec<ConvertiblePair>> {
            None
        }

        fn convert(
            &self,
            value: Option<&Value>,
            _: &TypeDescriptor<'_>,
            _: &TypeDescriptor<'_>,
        ) -> Result<Option<Value>, BoxError> {
            Ok(value.map(|v| Value::new(format!("{v:?}"))))
        }
    }

    let (service, _) = service();
    let err = service.add_generic_converter(Everything).unwrap_err();
    assert_eq!(err, typeconv::RegistrationError::UnconditionalGlobal);
}

// =============================================================================
// String -> int scenario
// =============================================================================

#[test]
fn test_string_to_int_scenario() {
    let service = ConversionService::builder().build().unwrap();
    service
        .add_converter(|s: &String| s.parse::<i32>())
        .unwrap();

    let out = service.convert(text("42"), builtins::INT32).unwrap().unwrap();
    assert_eq!(out.downcast::<i32>().unwrap(), 42);

    let err = service.convert(text("abc"), builtins::INT32).unwrap_err();
    assert!(err.is_conversion_failed());
    let cause = std::error::Error::source(&err).unwrap();
    assert!(cause.downcast_ref::<std::num::ParseIntError>().is_some());
    assert!(err.to_string().contains("[string]"));
    assert!(err.to_string().contains("[\"abc\"]"));
}

// =============================================================================
// Default converters
// =============================================================================

#[test]
fn test_default_string_to_numbers() {
    let (service, _) = service_with_defaults();
    assert_eq!(service.convert_into::<i32>(text(" 42 ")).unwrap(), Some(42));
    assert_eq!(service.convert_into::<u8>(text("0xff")).unwrap(), Some(255));
    assert_eq!(service.convert_into::<i64>(text("-7")).unwrap(), Some(-7));
    assert_eq!(service.convert_into::<f64>(text("2.5")).unwrap(), Some(2.5));

    let err = service.convert_into::<u8>(text("256")).unwrap_err();
    assert!(err.is_conversion_failed());

    // Blank text becomes null, which a primitive target rejects.
    let err = service.convert_into::<i32>(text("  ")).unwrap_err();
    assert!(err.is_conversion_failed());
}

#[test]
fn test_default_number_conversions() {
    let (service, _) = service_with_defaults();
    assert_eq!(
        service.convert_into::<String>(Some(Value::new(12u16))).unwrap().as_deref(),
        Some("12")
    );
    assert_eq!(service.convert_into::<i64>(Some(Value::new(5i8))).unwrap(), Some(5));
    assert_eq!(service.convert_into::<i32>(Some(Value::new(9.9f64))).unwrap(), Some(9));

    let err = service
        .convert_into::<i8>(Some(Value::new(1000i32)))
        .unwrap_err();
    let cause = std::error::Error::source(&err).unwrap();
    assert!(matches!(
        cause.downcast_ref::<DefaultConverterError>(),
        Some(DefaultConverterError::NumberOverflow { .. })
    ));

    assert!(service.can_bypass_convert(Some(builtins::INT32), builtins::INT32));
    assert!(service.can_bypass_convert(Some(builtins::INT32), builtins::NUMBER));
}

#[test]
fn test_default_booleans() {
    let (service, _) = service_with_defaults();
    assert_eq!(service.convert_into::<bool>(text("YES")).unwrap(), Some(true));
    assert_eq!(service.convert_into::<bool>(text("off")).unwrap(), Some(false));
    assert!(service.convert_into::<bool>(text("maybe")).unwrap_err().is_conversion_failed());
    assert_eq!(
        service.convert_into::<String>(Some(Value::new(true))).unwrap().as_deref(),
        Some("true")
    );
}

#[test]
fn test_default_enums() {
    let (service, zoo) = service_with_defaults();

    let green = service.convert(text("Green"), zoo.color).unwrap().unwrap();
    assert_eq!(green.type_hash(), zoo.color);
    assert_eq!(
        green.downcast_ref::<EnumConstant>(),
        Some(&EnumConstant::new("Green", 1))
    );

    let err = service.convert(text("Purple"), zoo.color).unwrap_err();
    assert!(err.is_conversion_failed());

    let name = service.convert_into::<String>(Some(green)).unwrap();
    assert_eq!(name.as_deref(), Some("Green"));

    let blue = Value::with_type(zoo.color, EnumConstant::new("Blue", 2));
    assert_eq!(service.convert_into::<u8>(Some(blue)).unwrap(), Some(2));

    assert!(!service.can_convert(Some(zoo.color), builtins::BOOL));
}

#[test]
fn test_user_converter_overrides_default() {
    let (service, _) = service_with_defaults();
    service
        .add_converter(|b: &bool| -> Result<String, BoxError> {
            Ok(if *b { "on".into() } else { "off".into() })
        })
        .unwrap();
    assert_eq!(
        service.convert_into::<String>(Some(Value::new(true))).unwrap().as_deref(),
        Some("on")
    );
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_convert_and_register() {
    let (service, zoo) = service_with_defaults();
    let service = Arc::new(service);
    let socket = zoo.socket;

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let out = service.convert_into::<i32>(text("42")).unwrap();
                    assert_eq!(out, Some(42));
                }
            })
        })
        .collect();

    for i in 0..20 {
        let label: &'static str = if i % 2 == 0 { "even" } else { "odd" };
        service
            .add_converter_for(socket, builtins::STRING, labeled(label))
            .unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(
        convert_text(&service, Value::with_type(socket, ()), builtins::STRING),
        "odd"
    );
}
