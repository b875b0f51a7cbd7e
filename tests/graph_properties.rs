//! Integration tests for link lifetime, extension replacement, detachment and
//! accessor behavior through the public API.

use gltf_graph::prelude::*;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn khronos_doc() -> PropertyGraph {
    PropertyGraph::with_extensions(ExtensionRegistry::khronos())
}

#[test]
fn test_extension_replacement_keeps_one_link() {
    init_logging();
    let mut doc = khronos_doc();
    let material = doc.create_material("paint").unwrap();
    let x = doc.create_extension_property(KHR_MATERIALS_UNLIT).unwrap();
    let y = doc.create_extension_property(KHR_MATERIALS_UNLIT).unwrap();

    doc.set_extension(material, KHR_MATERIALS_UNLIT, Some(x)).unwrap();
    let first = doc.graph().slot_links(material, SLOT_EXTENSIONS).unwrap()[0];

    let fired = Arc::new(AtomicUsize::new(0));
    let f = fired.clone();
    doc.on_link_dispose(first, move |link| {
        assert_eq!(link.name(), KHR_MATERIALS_UNLIT);
        f.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    let links_before = doc.graph().num_links();
    doc.set_extension(material, KHR_MATERIALS_UNLIT, Some(y)).unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(doc.graph().is_disposed(first));
    assert_eq!(doc.graph().num_links(), links_before + 1);

    let named: Vec<_> = doc
        .graph()
        .child_links(material)
        .iter()
        .filter_map(|l| doc.graph().link(*l))
        .filter(|l| l.name() == KHR_MATERIALS_UNLIT)
        .collect();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].right(), y);
    assert_eq!(doc.get_extension(material, KHR_MATERIALS_UNLIT), Some(y));
}

#[test]
fn test_detach_leaves_only_root() {
    init_logging();
    let mut doc = PropertyGraph::new();
    let texture = doc.create_texture("albedo").unwrap();
    let materials: Vec<_> = (0..3)
        .map(|i| {
            let m = doc.create_material(format!("m{i}")).unwrap();
            doc.set_base_color_texture(m, Some(texture)).unwrap();
            m
        })
        .collect();

    doc.detach(texture).unwrap();
    assert_eq!(doc.list_parents(texture), vec![doc.root()]);
    for m in materials {
        assert_eq!(doc.base_color_texture(m), None);
    }
}

#[test]
fn test_dispose_link_through_property_graph() {
    let mut doc = PropertyGraph::new();
    let buffer = doc.create_buffer("bin").unwrap();
    let acc = doc
        .create_accessor("idx", vec![0u16, 1, 2], ElementShape::Scalar)
        .unwrap();
    doc.set_accessor_buffer(acc, Some(buffer)).unwrap();
    let link = doc.graph().slot_links(acc, SLOT_BUFFER).unwrap()[0];

    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    doc.on_link_dispose(link, move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    for _ in 0..3 {
        doc.dispose_link(link).unwrap();
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(doc.graph().is_disposed(link));
    assert_eq!(doc.accessor_buffer(acc), None);
}

#[test]
fn test_accessor_statistics() {
    let mut doc = PropertyGraph::new();
    let acc = doc
        .create_accessor("pos", vec![1f32, 2.0, 3.0, 4.0, 0.0, 6.0], ElementShape::Vec3)
        .unwrap();
    let a = doc.accessor(acc).unwrap();
    assert_eq!(a.component_type(), Ok(ComponentType::Float));
    assert_eq!(a.count(), 2);
    assert_eq!(a.min(), vec![1.0, 0.0, 3.0]);
    assert_eq!(a.max(), vec![4.0, 2.0, 6.0]);
}

#[test]
fn test_uint32_indices_from_bytes_read_exactly() {
    let indices = [16_777_217u32, 4_000_000_000, 7];
    let bytes: Vec<u8> = indices.iter().flat_map(|v| v.to_le_bytes()).collect();
    let array = TypedArray::from_bytes(ScalarKind::Uint32, &bytes).unwrap();
    let acc = Accessor::new(array, ElementShape::Scalar).unwrap();
    assert_eq!(acc.component_type(), Ok(ComponentType::UnsignedInt));
    for (i, v) in indices.iter().enumerate() {
        assert_eq!(acc.get_x(i), *v as f64);
    }
    assert_eq!(acc.max(), vec![4_000_000_000.0]);
}

#[test]
fn test_accessor_bytes_for_serialization() {
    let bytes: Vec<u8> = [1.5f32, -2.0]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();
    let array = TypedArray::from_bytes(ScalarKind::Float32, &bytes).unwrap();
    let acc = Accessor::new(array, ElementShape::Vec2).unwrap();
    assert_eq!(acc.get_xy(0), DVec2::new(1.5, -2.0));
    assert_eq!(acc.array().as_bytes(), bytes.as_slice());
}

proptest! {
    #[test]
    fn prop_dispose_fires_once(times in 1usize..8) {
        let mut graph = Graph::new();
        let a = graph.create_node(&[]);
        let b = graph.create_node(&[]);
        let link = graph.create_link("ref", a, b).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        graph.on_dispose(link, move |_| { h.fetch_add(1, Ordering::SeqCst); }).unwrap();

        for _ in 0..times {
            graph.dispose_link(link).unwrap();
        }
        prop_assert_eq!(hits.load(Ordering::SeqCst), 1);
        prop_assert!(graph.is_disposed(link));
    }

    #[test]
    fn prop_set_get_xyz(values in prop::collection::vec(
        (-1.0e6f32..1.0e6, -1.0e6f32..1.0e6, -1.0e6f32..1.0e6), 1..32)
    ) {
        let mut acc = Accessor::zeros(ScalarKind::Float32, ElementShape::Vec3, values.len());
        for (i, (x, y, z)) in values.iter().enumerate() {
            let v = DVec3::new(*x as f64, *y as f64, *z as f64);
            acc.set_xyz(i, v);
            prop_assert_eq!(acc.get_xyz(i), v);
        }
        prop_assert_eq!(acc.count(), values.len());
    }

    #[test]
    fn prop_uint32_set_get_exact(values in prop::collection::vec(any::<u32>(), 1..32)) {
        let mut acc = Accessor::zeros(ScalarKind::Uint32, ElementShape::Scalar, values.len());
        for (i, v) in values.iter().enumerate() {
            acc.set_x(i, *v as f64);
            prop_assert_eq!(acc.get_x(i), *v as f64);
        }
        prop_assert_eq!(acc.array().as_slice::<u32>(), Some(values.as_slice()));
    }

    #[test]
    fn prop_min_le_max(values in prop::collection::vec(any::<i16>(), 0..20)) {
        let len = values.len() - values.len() % 2;
        let acc = Accessor::new(values[..len].to_vec(), ElementShape::Vec2).unwrap();
        let (min, max) = (acc.min(), acc.max());
        if acc.count() > 0 {
            for j in 0..2 {
                prop_assert!(min[j] <= max[j]);
            }
        } else {
            prop_assert_eq!(min, vec![f64::INFINITY; 2]);
        }
    }

    #[test]
    fn prop_detach_leaves_only_root(owners in 0usize..6) {
        let mut doc = PropertyGraph::new();
        let texture = doc.create_texture("t").unwrap();
        for i in 0..owners {
            let m = doc.create_material(format!("m{i}")).unwrap();
            doc.set_base_color_texture(m, Some(texture)).unwrap();
        }
        prop_assert_eq!(doc.detach(texture).unwrap(), owners);
        prop_assert_eq!(doc.list_parents(texture), vec![doc.root()]);
    }
}
