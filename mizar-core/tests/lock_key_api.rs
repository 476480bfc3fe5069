use mizar_common::prelude::*;
use mizar_common::{InvocationContext, LockSpec};
use mizar_core::LockKeyUtils;

fn order_service_pay() -> InvocationContext {
    InvocationContext::new("OrderService", "pay")
}

#[test]
fn resolve_from_attribute() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();

    let spec = LockSpec::with_attribute_names(vec!["orderId".into()]);
    let mut ctx = order_service_pay();
    ctx.add_parameter("orderId", "A1".into());

    let lock_key = LockKeyUtils::resolve_lock_key(&spec, &ctx);
    eprintln!("resolved lock key is: {}", lock_key);
    assert_eq!(lock_key, "OrderService.pay.A1");
}

#[test]
fn explicit_key_precedence() {
    let mut spec = LockSpec::with_lock_key("payments");
    spec.attribute_names = vec!["orderId".into()];
    let mut ctx = order_service_pay();
    ctx.add_parameter("orderId", "A1".into());

    assert_eq!(LockKeyUtils::resolve_lock_key(&spec, &ctx), "payments");
}

#[test]
fn missing_root_falls_back_to_bare_operation() {
    let spec = LockSpec::with_attribute_names(vec!["req.userId".into()]);
    let mut ctx = order_service_pay();
    ctx.add_parameter("orderId", "A1".into());

    // coarse fallback: contention is scoped to any call of the operation
    assert_eq!(LockKeyUtils::resolve_lock_key(&spec, &ctx), "OrderService.pay");
}

#[test]
fn resolve_is_deterministic() {
    let spec = LockSpec::with_attribute_names(vec!["orderId".into(), "region".into()]);
    let mut ctx = order_service_pay();
    ctx.add_parameter("orderId", "A1".into());
    ctx.add_parameter("region", "eu-1".into());

    let first = LockKeyUtils::resolve_lock_key(&spec, &ctx);
    for _ in 0..3 {
        assert_eq!(LockKeyUtils::resolve_lock_key(&spec, &ctx), first);
    }
    assert_eq!(first, "OrderService.pay.A1.eu-1");
}

#[test]
fn nested_map_path() {
    let spec = LockSpec::with_attribute_names(vec!["req.userId".into()]);
    let mut ctx = order_service_pay();
    let req: serde_json::Value =
        serde_json::from_str(r#"{"userId": "U7", "amount": 12}"#).expect("parse json failed");
    ctx.add_parameter("req", Object::from_json(&req));

    assert_eq!(
        LockKeyUtils::resolve_lock_key(&spec, &ctx),
        "OrderService.pay.U7"
    );
}

#[test]
fn list_root_uses_indexed_lookup() {
    let spec = LockSpec::with_attribute_names(vec!["items.0.sku".into()]);
    let mut ctx = order_service_pay();
    let items: serde_json::Value =
        serde_json::from_str(r#"[{"sku": "S-9", "qty": 2}, {"sku": "S-3", "qty": 1}]"#)
            .expect("parse json failed");
    ctx.add_parameter("items", Object::from_json(&items));

    assert_eq!(
        LockKeyUtils::resolve_lock_key(&spec, &ctx),
        "OrderService.pay.S-9"
    );
}

#[test]
fn integer_arguments_use_string_form() {
    let spec = LockSpec::with_attribute_names(vec!["orderId".into()]);
    let mut ctx = order_service_pay();
    ctx.add_parameter("orderId", Object::Long(42));

    assert_eq!(
        LockKeyUtils::resolve_lock_key(&spec, &ctx),
        "OrderService.pay.42"
    );
}

#[test]
fn no_attributes_with_arguments_locks_whole_operation() {
    let spec = LockSpec::new();
    let mut ctx = order_service_pay();
    ctx.add_parameter("orderId", "A1".into());

    assert_eq!(LockKeyUtils::resolve_lock_key(&spec, &ctx), "OrderService.pay");
}

#[test]
fn empty_when_nothing_to_derive() {
    let spec = LockSpec::new();
    let ctx = order_service_pay();

    assert_eq!(LockKeyUtils::resolve_lock_key(&spec, &ctx), "");
}

#[test]
fn attribute_order_is_identity_order() {
    let spec = LockSpec::with_attribute_names(vec!["region".into(), "orderId".into()]);
    let mut ctx = order_service_pay();
    ctx.add_parameter("orderId", "A1".into());
    ctx.add_parameter("region", "eu-1".into());

    // declaration order of the paths, not parameter order
    assert_eq!(
        LockKeyUtils::resolve_lock_key(&spec, &ctx),
        "OrderService.pay.eu-1.A1"
    );
}
