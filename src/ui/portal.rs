//! Rendering UI content into a named host layer, outside of the caller's layout.
//!
//! A host is identified by a string id. A [`Portal`] reuses the host with its
//! id if one exists, or creates one that lives as long as the portal.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// The set of host layers currently attached to the UI.
///
/// Cloning gives another handle to the same set.
#[derive(Clone, Debug, Default)]
pub struct PortalHosts {
    ids: Rc<RefCell<BTreeSet<String>>>,
}

impl PortalHosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a host with this id is attached.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.borrow().contains(id)
    }

    /// Attaches a host. Returns `false` if it was already attached.
    pub fn attach(&self, id: &str) -> bool {
        self.ids.borrow_mut().insert(id.to_owned())
    }

    /// Detaches a host. Returns `false` if it was not attached.
    pub fn detach(&self, id: &str) -> bool {
        self.ids.borrow_mut().remove(id)
    }

    /// Number of attached hosts.
    pub fn len(&self) -> usize {
        self.ids.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.borrow().is_empty()
    }
}

/// Renders content into the host layer `id`.
///
/// Whether the portal owns its host is decided once, when it is created: if
/// no host with that id is attached yet, the portal creates one (it is
/// *dynamic*), attaches it the first time it is shown, and detaches it when
/// dropped. A host that already existed is used as is and never detached.
#[derive(Debug)]
pub struct Portal {
    id: String,
    hosts: PortalHosts,
    dynamic: bool,
    mounted: bool,
    anchor: egui::Align2,
    offset: egui::Vec2,
}

impl Portal {
    pub fn new(hosts: &PortalHosts, id: impl Into<String>) -> Portal {
        let id = id.into();

        Portal {
            dynamic: !hosts.contains(&id),
            hosts: hosts.clone(),
            id,
            mounted: false,
            anchor: egui::Align2::LEFT_TOP,
            offset: egui::Vec2::ZERO,
        }
    }

    /// Pins the host layer to a corner or edge of the screen.
    pub fn with_anchor(mut self, anchor: egui::Align2, offset: egui::Vec2) -> Portal {
        self.anchor = anchor;
        self.offset = offset;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this portal created, and owns, its host.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Attaches the host if this portal owns it. Done by the first
    /// [`show`](Self::show), calling it again has no effect.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }

        if self.dynamic {
            self.hosts.attach(&self.id);
        }

        self.mounted = true;
    }

    /// Renders `add_contents` into the host layer.
    ///
    /// The layer is a foreground area anchored on the screen, unaffected by
    /// the layout of whatever UI calls this.
    pub fn show<R>(
        &mut self,
        ctx: &egui::Context,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> R {
        self.mount();

        egui::Area::new(egui::Id::new(("portal", self.id.as_str())))
            .order(egui::Order::Foreground)
            .anchor(self.anchor, self.offset)
            .interactable(false)
            .show(ctx, add_contents)
            .inner
    }
}

impl Drop for Portal {
    fn drop(&mut self) {
        if self.dynamic && self.mounted && self.hosts.contains(&self.id) {
            self.hosts.detach(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_host_is_dynamic_and_removed_on_drop() {
        let hosts = PortalHosts::new();
        let mut portal = Portal::new(&hosts, "debug");

        assert!(portal.is_dynamic());
        assert!(!hosts.contains("debug"));

        portal.mount();
        assert!(hosts.contains("debug"));

        drop(portal);
        assert!(hosts.is_empty());
    }

    #[test]
    fn existing_host_is_static_and_kept() {
        let hosts = PortalHosts::new();
        hosts.attach("debug");

        let mut portal = Portal::new(&hosts, "debug");
        assert!(!portal.is_dynamic());

        portal.mount();
        drop(portal);
        assert!(hosts.contains("debug"));
    }

    #[test]
    fn unmounted_portal_touches_nothing() {
        let hosts = PortalHosts::new();
        let portal = Portal::new(&hosts, "debug");
        // Someone else attaches the host after the portal decided to own it.
        hosts.attach("debug");
        drop(portal);
        assert!(hosts.contains("debug"));
    }

    #[test]
    fn dynamic_decision_is_taken_once() {
        let hosts = PortalHosts::new();
        let mut portal = Portal::new(&hosts, "debug");
        portal.mount();
        portal.mount();
        assert!(portal.is_dynamic());
        assert_eq!(hosts.len(), 1);

        // A second portal sees the host attached by the first one.
        let second = Portal::new(&hosts, "debug");
        assert!(!second.is_dynamic());
        drop(portal);
        assert!(!hosts.contains("debug"));
        drop(second);
        assert!(!hosts.contains("debug"));
    }

    #[test]
    fn detached_host_is_not_removed_twice() {
        let hosts = PortalHosts::new();
        let mut portal = Portal::new(&hosts, "debug");
        portal.mount();
        hosts.detach("debug");
        drop(portal);
        assert!(hosts.is_empty());
    }

    #[test]
    fn show_renders_into_the_host_layer() {
        let hosts = PortalHosts::new();
        let mut portal = Portal::new(&hosts, "debug")
            .with_anchor(egui::Align2::LEFT_BOTTOM, egui::Vec2::ZERO);
        let ctx = egui::Context::default();

        let mut shown = 0;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            shown = portal.show(ctx, |ui| {
                ui.label("Frame: 1");
                1
            });
        });

        assert_eq!(shown, 1);
        assert!(portal.is_mounted());
        assert!(hosts.contains("debug"));
    }
}
