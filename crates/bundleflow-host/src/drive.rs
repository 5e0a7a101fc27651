//! Drive loops - poll bundle operations and tick the host until they finish

use crate::error::{Error, Result};
use crate::host::SimHost;
use bundleflow_core::{BundleOperation, WaitUntil};

impl SimHost {
    /// Poll `op` and tick until it is done
    ///
    /// Each round polls the operation first, then ticks the host if it is
    /// still pending. Returns the number of ticks executed, or
    /// [`Error::Stalled`] when the operation is still pending after
    /// `max_ticks` ticks. The budget is checked before every tick, so a
    /// budget of zero never ticks.
    ///
    /// # Example
    ///
    /// ```
    /// use bundleflow_core::{LoadRequest, SceneBundle};
    /// use bundleflow_host::SimHost;
    ///
    /// let mut host = SimHost::new();
    /// host.register_scene("a");
    /// host.register_scene("b");
    ///
    /// let mut op = LoadRequest::new(SceneBundle::new("ab", ["a", "b"])).start(&mut host);
    /// let ticks = host.drive(&mut op, 100).unwrap();
    /// assert_eq!(ticks, 8); // two scenes at the default four ticks each
    /// ```
    pub fn drive<O>(&mut self, op: &mut O, max_ticks: u64) -> Result<u64>
    where
        O: BundleOperation<SimHost> + ?Sized,
    {
        let start = self.current_tick();
        let mut stalled = false;
        let mut wait = WaitUntil::new(|| {
            if op.poll(self) {
                return true;
            }
            if self.current_tick() - start >= max_ticks {
                stalled = true;
                return true;
            }
            self.tick();
            false
        });
        while wait.keep_waiting() {}
        drop(wait);

        let ticks = self.current_tick() - start;
        if stalled {
            return Err(Error::Stalled { ticks });
        }
        Ok(ticks)
    }

    /// Poll every operation once per tick until all of them are done
    ///
    /// Operations share the scheduler, so their priorities decide which
    /// transitions advance first.
    pub fn drive_all(
        &mut self,
        ops: &mut [&mut dyn BundleOperation<SimHost>],
        max_ticks: u64,
    ) -> Result<u64> {
        let start = self.current_tick();
        loop {
            let mut all_done = true;
            for op in ops.iter_mut() {
                all_done &= op.poll(self);
            }
            if all_done {
                return Ok(self.current_tick() - start);
            }
            if self.current_tick() - start >= max_ticks {
                return Err(Error::Stalled {
                    ticks: self.current_tick() - start,
                });
            }
            self.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, SceneCatalog, SceneCost, SimHost};
    use bundleflow_core::{
        BundleOperation, EnvironmentQuery, LoadParams, LoadRequest, SceneBundle, SceneId,
        UnloadRequest,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    fn host() -> SimHost {
        let catalog = SceneCatalog::new()
            .with_scene("menu", SceneCost::new(1, 1))
            .with_scene("a", SceneCost::new(2, 1))
            .with_scene("b", SceneCost::new(2, 1))
            .with_scene("c", SceneCost::new(2, 1))
            .with_scene("d", SceneCost::new(2, 1))
            .with_scene("e", SceneCost::new(2, 1));
        let mut host = SimHost::with_catalog(catalog);
        host.open_scene("menu").unwrap();
        host
    }

    #[test]
    fn test_drive_load_bundle() {
        let mut host = host();
        let log = Rc::new(RefCell::new(Vec::new()));
        let scenes = log.clone();
        let done = log.clone();
        let mut op = LoadRequest::new(SceneBundle::new("abc", ["a", "b", "c"]))
            .on_scene_loaded(move |s| scenes.borrow_mut().push(s.to_string()))
            .on_completed(move |_| done.borrow_mut().push("done".to_string()))
            .start(&mut host);

        let ticks = host.drive(&mut op, 100).unwrap();
        assert_eq!(ticks, 6);
        assert_eq!(*log.borrow(), vec!["a", "b", "c", "done"]);
        assert_eq!(host.open_scene_count(), 4);
    }

    #[test]
    fn test_progress_monotonic_under_drive() {
        let mut host = host();
        let mut op = LoadRequest::new(SceneBundle::new("abc", ["a", "b", "c"])).start(&mut host);

        let mut samples = vec![op.progress()];
        while !op.poll(&mut host) {
            host.tick();
            samples.push(op.progress());
            assert_eq!(op.progress() == 1.0, op.is_done());
        }
        samples.push(op.progress());

        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*samples.last().unwrap(), 1.0);
    }

    #[test]
    fn test_drive_stalls_on_held_activation() {
        let mut host = host();
        let mut op = LoadRequest::new(SceneBundle::new("a", ["a"]))
            .with_allow_first_activation(false)
            .start(&mut host);

        let result = host.drive(&mut op, 10);
        assert!(matches!(result, Err(Error::Stalled { ticks: 10 })));
        assert!(op.first_scene_ready());

        op.set_allow_first_activation(true);
        assert!(host.drive(&mut op, 10).is_ok());
        assert!(op.is_done());
    }

    #[test]
    fn test_single_mode_bundle_activates_first() {
        let mut host = host();
        let mut op = LoadRequest::new(SceneBundle::new("ab", ["a", "b"]))
            .with_params(LoadParams::single())
            .with_activate_first(true)
            .start(&mut host);

        host.drive(&mut op, 100).unwrap();
        // The second single-mode load replaces the first
        assert_eq!(host.open_scenes(), &[SceneId::new("b")]);
        assert_eq!(host.active_scene(), Some(SceneId::new("b")));
    }

    #[test]
    fn test_unload_guard_end_to_end() {
        let mut host = host();
        let mut load = LoadRequest::new(SceneBundle::new("a", ["a"])).start(&mut host);
        host.drive(&mut load, 100).unwrap();
        assert_eq!(host.open_scene_count(), 2);

        let mut unload =
            UnloadRequest::new(SceneBundle::new("all", ["menu", "a", "b"])).start(&mut host);
        host.drive(&mut unload, 100).unwrap();

        assert!(unload.stopped_early());
        assert_eq!(unload.scenes_processed(), 1);
        assert_eq!(host.open_scenes(), &[SceneId::new("a")]);
    }

    #[test]
    fn test_drive_all_respects_priority() {
        let mut host = host();
        let order = Rc::new(RefCell::new(Vec::new()));
        let low_log = order.clone();
        let high_log = order.clone();

        let mut low = LoadRequest::new(SceneBundle::new("low", ["a", "b"]))
            .on_completed(move |b| low_log.borrow_mut().push(b.name().to_string()))
            .start(&mut host);
        let mut high = LoadRequest::new(SceneBundle::new("high", ["c", "d"]))
            .with_priority(5)
            .on_completed(move |b| high_log.borrow_mut().push(b.name().to_string()))
            .start(&mut host);

        host.drive_all(&mut [&mut low, &mut high], 100).unwrap();
        assert_eq!(*order.borrow(), vec!["high", "low"]);
    }

    #[test]
    fn test_concurrent_unloads_keep_one_scene_open() {
        let mut host = host();
        let mut load = LoadRequest::new(SceneBundle::new("a", ["a"])).start(&mut host);
        host.drive(&mut load, 100).unwrap();

        let mut first = UnloadRequest::new(SceneBundle::new("menu", ["menu"])).start(&mut host);
        let mut second = UnloadRequest::new(SceneBundle::new("a", ["a"])).start(&mut host);
        host.drive_all(&mut [&mut first, &mut second], 100).unwrap();

        assert_eq!(host.open_scene_count(), 1);
        assert_eq!(host.open_scenes(), &[SceneId::new("a")]);
        assert_eq!(first.scenes_processed(), 1);
        assert_eq!(second.scenes_processed(), 0);
    }

    #[test]
    fn test_zero_budget_does_not_tick() {
        let mut host = host();
        let mut op = LoadRequest::new(SceneBundle::new("a", ["a"])).start(&mut host);

        let result = host.drive(&mut op, 0);
        assert!(matches!(result, Err(Error::Stalled { ticks: 0 })));
        assert_eq!(host.current_tick(), 0);

        let result = host.drive_all(&mut [&mut op], 0);
        assert!(matches!(result, Err(Error::Stalled { ticks: 0 })));
        assert_eq!(host.current_tick(), 0);
    }

    #[test]
    fn test_drive_empty_bundle() {
        let mut host = host();
        let mut op = UnloadRequest::new(SceneBundle::new("none", Vec::<SceneId>::new()))
            .start(&mut host);
        assert_eq!(host.drive(&mut op, 1).unwrap(), 0);
    }
}
