//! Integration tests: layer store → display-list frame → hit testing.

use caption_core::id::LayerId;
use caption_core::model::{CanvasState, TextLayer};
use caption_core::store::{LayerMutation, LayerStore, Reorder};
use caption_core::surface::RenderSurface;
use caption_render::{DisplayListSurface, hit_test};
use pretty_assertions::assert_eq;

fn store_with(ids: &[&str]) -> LayerStore {
    let mut store = LayerStore::new();
    for id in ids {
        store
            .apply(LayerMutation::Add {
                layer: Box::new(TextLayer::centered(
                    LayerId::intern(id),
                    &CanvasState::default(),
                )),
            })
            .unwrap();
    }
    store
}

fn paint(store: &LayerStore) -> DisplayListSurface {
    let mut surface = DisplayListSurface::new();
    surface.begin_frame(&CanvasState::default());
    for layer in store.visible() {
        surface.draw(layer);
    }
    surface
}

#[test]
fn paint_order_follows_store_order() {
    let mut store = store_with(&["a", "b", "c"]);
    let ids = |names: &[&str]| names.iter().map(|n| LayerId::intern(n)).collect::<Vec<_>>();

    assert_eq!(paint(&store).frame().text_ids(), ids(&["a", "b", "c"]));

    store
        .apply(LayerMutation::Reorder {
            id: LayerId::intern("c"),
            direction: Reorder::Up,
        })
        .unwrap();
    store
        .apply(LayerMutation::ToggleVisibility {
            id: LayerId::intern("a"),
        })
        .unwrap();
    assert_eq!(paint(&store).frame().text_ids(), ids(&["c", "b"]));
}

#[test]
fn click_on_stacked_layers_hits_the_top_one() {
    let store = store_with(&["bottom", "top"]);
    // Both are centered on the canvas; the later one is painted over.
    assert_eq!(
        hit_test(store.layers(), 400.0, 300.0),
        Some(LayerId::intern("top"))
    );
    assert_eq!(hit_test(store.layers(), 10.0, 10.0), None);
}
