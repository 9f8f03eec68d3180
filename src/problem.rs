use crate::space::Action;
use crate::space::Space;
use crate::space::State;

/// A search problem with a single start and a single goal.
pub trait Problem<Sp, St, A>: std::fmt::Debug
where
    Sp: Space<St, A>,
    St: State,
    A: Action,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> &St;
    fn goal(&self) -> &St;

    fn is_goal(&self, s: &St) -> bool {
        self.goal() == s
    }
}
