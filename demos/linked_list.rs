// A simple doubly linked list on top of IdVec, linked through handles so a
// dangling link is caught instead of silently following a recycled id.

use idvec::{Handle, IdVec};

struct Node<T> {
    value: T,
    prev: Option<Handle<Node<T>>>,
    next: Option<Handle<Node<T>>>,
}

struct List<T> {
    nodes: IdVec<Node<T>>,
    head: Option<Handle<Node<T>>>,
    tail: Option<Handle<Node<T>>>,
}

impl<T> List<T> {
    fn new() -> Self {
        Self {
            nodes: IdVec::new(),
            head: None,
            tail: None,
        }
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn push_head(&mut self, value: T) -> Handle<Node<T>> {
        let id = self.nodes.insert(Node {
            value,
            prev: None,
            next: self.head,
        });
        let h = self.nodes.handle(id);

        if let Some(head) = self.head {
            head.get_mut(&mut self.nodes).prev = Some(h);
        } else {
            self.tail = Some(h);
        }
        self.head = Some(h);
        h
    }

    fn push_tail(&mut self, value: T) -> Handle<Node<T>> {
        let id = self.nodes.insert(Node {
            value,
            prev: self.tail,
            next: None,
        });
        let h = self.nodes.handle(id);

        if let Some(tail) = self.tail {
            tail.get_mut(&mut self.nodes).next = Some(h);
        } else {
            self.head = Some(h);
        }
        self.tail = Some(h);
        h
    }

    fn unlink(&mut self, h: Handle<Node<T>>) -> Option<T> {
        let node = self.nodes.try_remove_handle(&h).ok()?;
        match node.prev {
            Some(prev) => prev.get_mut(&mut self.nodes).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => next.get_mut(&mut self.nodes).prev = node.prev,
            None => self.tail = node.prev,
        }
        Some(node.value)
    }

    fn pop_head(&mut self) -> Option<T> {
        self.unlink(self.head?)
    }

    fn pop_tail(&mut self) -> Option<T> {
        self.unlink(self.tail?)
    }
}

fn main() {
    let mut dll = List::new();
    dll.push_head(5);
    let six = dll.push_tail(6);
    dll.push_tail(7);
    dll.push_head(4);

    assert_eq!(dll.len(), 4);
    assert_eq!(dll.unlink(six), Some(6));
    assert_eq!(dll.unlink(six), None);

    // Reuses the id of 6, but the old handle stays dead.
    dll.push_tail(8);
    assert!(!six.is_valid(&dll.nodes));

    assert_eq!(dll.pop_head(), Some(4));
    assert_eq!(dll.pop_head(), Some(5));
    assert_eq!(dll.pop_tail(), Some(8));
    assert_eq!(dll.pop_tail(), Some(7));
    assert_eq!(dll.pop_head(), None);
}
