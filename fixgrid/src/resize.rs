//! Pointer-drag column resizing.
//!
//! A drag runs begin -> move* -> end. Moves only record the latest width and
//! (re)schedule a single animation frame; the frame callback writes the live
//! preview. Release commits the latest width whether or not its frame ran.

use log::{debug, trace, warn};

use crate::column::{ColumnWidths, MIN_COLUMN_WIDTH};

/// Handle of a scheduled animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Handle of an installed pair of global pointer-move/pointer-up listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// The host environment a drag needs: frame scheduling, global pointer
/// listeners and the drag cursor.
pub trait DragHost {
    /// Schedule a frame callback. The host later calls back into the grid
    /// with the returned handle.
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn attach_pointer_listeners(&mut self) -> ListenerHandle;
    fn detach_pointer_listeners(&mut self, handle: ListenerHandle);
    fn set_drag_cursor(&mut self, active: bool);
}

/// A [`DragHost`] that only hands out handles and remembers what is pending.
///
/// Suits hosts that drive frames themselves, such as the terminal renderer
/// or tests: after pointer moves, call the grid's frame callback with
/// [`FrameQueue::take_pending`].
#[derive(Debug, Default)]
pub struct FrameQueue {
    next: u64,
    pending: Option<FrameHandle>,
    listeners: Option<ListenerHandle>,
    cursor: bool,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn listeners_attached(&self) -> bool {
        self.listeners.is_some()
    }

    pub fn cursor_active(&self) -> bool {
        self.cursor
    }

    fn next_id(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

impl DragHost for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn attach_pointer_listeners(&mut self) -> ListenerHandle {
        let handle = ListenerHandle(self.next_id());
        self.listeners = Some(handle);
        handle
    }

    fn detach_pointer_listeners(&mut self, handle: ListenerHandle) {
        if self.listeners == Some(handle) {
            self.listeners = None;
        }
    }

    fn set_drag_cursor(&mut self, active: bool) {
        self.cursor = active;
    }
}

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    column_id: String,
    start_x: f64,
    start_width: f64,
    latest_width: f64,
    pending: Option<FrameHandle>,
    listeners: ListenerHandle,
}

/// Resize drag state machine.
///
/// Owns its [`DragHost`]; dropping the controller mid-drag cancels the
/// pending frame, detaches the listeners and restores the cursor.
pub struct ResizeController {
    host: Box<dyn DragHost + Send>,
    drag: Option<ActiveDrag>,
}

impl ResizeController {
    pub fn new(host: Box<dyn DragHost + Send>) -> Self {
        Self { host, drag: None }
    }

    pub fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    /// Column being resized, if a drag is active.
    pub fn active_column(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.column_id.as_str())
    }

    /// Latest computed width of the active drag.
    pub fn latest_width(&self) -> Option<f64> {
        self.drag.as_ref().map(|d| d.latest_width)
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.drag.as_ref().and_then(|d| d.pending)
    }

    /// Start dragging `column_id`, whose effective width is `start_width`.
    ///
    /// A drag that is still active is committed first.
    pub fn begin(&mut self, column_id: &str, start_width: f64, x: f64, widths: &mut ColumnWidths) {
        if self.drag.is_some() {
            self.end(widths);
        }
        let listeners = self.host.attach_pointer_listeners();
        self.host.set_drag_cursor(true);
        debug!("Resize started on '{column_id}' at width {start_width}");
        self.drag = Some(ActiveDrag {
            column_id: column_id.to_string(),
            start_x: x,
            start_width,
            latest_width: start_width,
            pending: None,
            listeners,
        });
    }

    /// Record a pointer move. Returns the new width, or `None` without a drag.
    ///
    /// A frame already scheduled for an earlier move is cancelled and a fresh
    /// one requested, so at most one preview update runs per frame.
    pub fn pointer_move(&mut self, x: f64) -> Option<f64> {
        let drag = self.drag.as_mut()?;
        drag.latest_width = (drag.start_width + (x - drag.start_x)).max(MIN_COLUMN_WIDTH);
        if let Some(stale) = drag.pending.take() {
            trace!("Coalescing resize frame {stale:?}");
            self.host.cancel_frame(stale);
        }
        drag.pending = Some(self.host.request_frame());
        Some(drag.latest_width)
    }

    /// Frame callback: write the latest width into the live preview.
    ///
    /// Returns `false` for a frame that is no longer pending.
    pub fn on_frame(&mut self, handle: FrameHandle, widths: &mut ColumnWidths) -> bool {
        match self.drag.as_mut() {
            Some(drag) if drag.pending == Some(handle) => {
                drag.pending = None;
                widths.set_live(&drag.column_id, drag.latest_width);
                true
            }
            _ => {
                trace!("Ignoring stale resize frame {handle:?}");
                false
            }
        }
    }

    /// Release: commit the latest width and tear the drag down.
    ///
    /// Returns the committed `(column, width)`, or `None` if no drag was
    /// active.
    pub fn end(&mut self, widths: &mut ColumnWidths) -> Option<(String, f64)> {
        let Some(drag) = self.drag.take() else {
            warn!("Resize release without an active drag ignored");
            return None;
        };
        self.release(&drag);
        widths.commit(&drag.column_id, drag.latest_width);
        debug!(
            "Resize committed '{}' at width {}",
            drag.column_id, drag.latest_width
        );
        Some((drag.column_id, drag.latest_width))
    }

    /// Abandon an active drag without committing. The live preview is dropped.
    pub fn cancel(&mut self, widths: &mut ColumnWidths) {
        if let Some(drag) = self.drag.take() {
            self.release(&drag);
            widths.clear_live();
            debug!("Resize of '{}' cancelled", drag.column_id);
        }
    }

    fn release(&mut self, drag: &ActiveDrag) {
        if let Some(pending) = drag.pending {
            self.host.cancel_frame(pending);
        }
        self.host.detach_pointer_listeners(drag.listeners);
        self.host.set_drag_cursor(false);
    }
}

impl Drop for ResizeController {
    fn drop(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.release(&drag);
        }
    }
}

impl std::fmt::Debug for ResizeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeController")
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}
