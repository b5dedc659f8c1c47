use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::grids::{CellKind, Coord, GridMaze};

/// A single cell mutation made by a generator or solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub coord: Coord,
    pub kind: CellKind,
}

impl Step {
    pub fn new(coord: Coord, kind: CellKind) -> Self {
        Self { coord, kind }
    }
}

/// Called after every cell mutation with the grid as it is now. Observers
/// only get a shared borrow, so they can look but never edit mid-run.
pub trait StepObserver {
    fn observe(&mut self, grid: &GridMaze, step: Step);
}

impl<F> StepObserver for F
where
    F: FnMut(&GridMaze, Step),
{
    fn observe(&mut self, grid: &GridMaze, step: Step) {
        self(grid, step)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn observe(&mut self, _grid: &GridMaze, _step: Step) {}
}

/// Forwards steps over an unbounded channel so a renderer can drain them at
/// its own pace, possibly from another thread. Sending never blocks the
/// algorithm.
#[derive(Debug)]
pub struct ChannelObserver {
    sender: UnboundedSender<Step>,
    disconnected: bool,
}

impl ChannelObserver {
    pub fn new() -> (Self, UnboundedReceiver<Step>) {
        let (sender, receiver) = mpsc::unbounded();
        (
            Self {
                sender,
                disconnected: false,
            },
            receiver,
        )
    }
}

impl StepObserver for ChannelObserver {
    fn observe(&mut self, _grid: &GridMaze, step: Step) {
        if self.disconnected {
            return;
        }

        if self.sender.unbounded_send(step).is_err() {
            log::debug!("step receiver dropped, no longer forwarding steps");
            self.disconnected = true;
        }
    }
}

#[cfg(test)]
mod test_observer {
    use super::*;
    use futures::executor::block_on;
    use futures::StreamExt;

    #[test]
    fn closures_are_observers() {
        let grid = GridMaze::new(5, 5).unwrap();
        let mut seen = Vec::new();
        {
            let mut observer = |_: &GridMaze, step: Step| seen.push(step);
            observer.observe(&grid, Step::new((1, 1), CellKind::Open));
            observer.observe(&grid, Step::new((1, 2), CellKind::Visited));
        }

        assert_eq!(
            seen,
            vec![
                Step::new((1, 1), CellKind::Open),
                Step::new((1, 2), CellKind::Visited)
            ]
        );
    }

    #[test]
    fn channel_delivers_steps_in_order() {
        let grid = GridMaze::new(5, 5).unwrap();
        let (mut observer, receiver) = ChannelObserver::new();

        observer.observe(&grid, Step::new((1, 1), CellKind::Visited));
        observer.observe(&grid, Step::new((1, 1), CellKind::OnPath));
        drop(observer);

        let steps: Vec<Step> = block_on(receiver.collect());
        assert_eq!(
            steps,
            vec![
                Step::new((1, 1), CellKind::Visited),
                Step::new((1, 1), CellKind::OnPath)
            ]
        );
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let grid = GridMaze::new(5, 5).unwrap();
        let (mut observer, receiver) = ChannelObserver::new();
        drop(receiver);

        observer.observe(&grid, Step::new((1, 1), CellKind::Visited));
        observer.observe(&grid, Step::new((1, 2), CellKind::Visited));
        assert!(observer.disconnected);
    }
}
