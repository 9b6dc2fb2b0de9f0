use crate::{Frontend, InstKind, Log};

#[test]
pub fn facade_reuse_test() {
    let frontend = Frontend::new();

    let first = frontend.compile("Lighting() + 1", "pass_one").unwrap();
    let second = frontend.compile("Lighting() + 1", "pass_two").unwrap();
    assert!(first.structural_eq(&second));

    // state from an earlier compile must not leak into the next one
    assert!(frontend.compile("(1", "broken").is_err());
    let third = frontend.compile("Lighting() + 1", "pass_three").unwrap();
    assert!(first.structural_eq(&third));
}

#[test]
pub fn canonical_display_test() {
    let frontend = Frontend::new();
    let ir = frontend
        .compile("Texture(0, UV(0)) * Vec3(0.5, 0.5, 1.0).rgb", "diffuse")
        .unwrap();
    assert_eq!(
        format!("{}", ir),
        "(Texture(0, UV(0)) * Vec3(0.5, 0.5, 1).xyz)"
    );
}

#[test]
pub fn instruction_tree_print_test() {
    let frontend = Frontend::new();
    let ir = frontend
        .compile("Texture(0, UV(0)) * LightDiffuse()", "print_me")
        .unwrap();
    ir.print().unwrap();
    assert!(ir.tree().is_some());
}

#[test]
pub fn traversal_accessor_test() {
    let frontend = Frontend::new();
    let ir = frontend.compile("Vec3(1, 2, 3).zx * 2", "accessors").unwrap();

    let root = ir.root().unwrap();
    assert_eq!(root.child_count(), 2);
    let swizzle = root.child(&ir, 0).unwrap();
    assert_eq!(swizzle.child_count(), 1);
    assert_eq!(swizzle.swizzle_mask(), Some("zx".to_string()));
    let constructor = swizzle.child(&ir, 0).unwrap();
    assert_eq!(constructor.call_name(), Some("Vec3"));
    assert_eq!(constructor.child_count(), 3);
    let lane = constructor.child(&ir, 2).unwrap();
    assert_eq!(lane.imm_vec(), Some(&[3.0, 3.0, 3.0, 3.0]));
    match &root.child(&ir, 1).unwrap().kind {
        InstKind::LoadImm(vec) => assert_eq!(vec[0], 2.0),
        other => panic!("expected an immediate, got {:?}", other),
    }
}

#[test]
pub fn log_label_test() {
    let frontend = Frontend::new();
    frontend.set_log(Log::Verbose("shade")).unwrap();
    assert!(frontend.set_log(Log::Default("shade")).is_err());
    frontend.compile("1 + 1", "logged").unwrap();
}
