// disjoint set union type for grouping cones that are
// linked through uncut constraints
// See: https://www.cs.princeton.edu/~wayne/kleinberg-tardos/pdf/UnionFind-2x2.pdf

#[derive(Debug)]
pub(crate) struct DisjointSetUnion {
    parents: Vec<usize>,
    ranks: Vec<usize>,
}

impl DisjointSetUnion {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parents: (0..n).collect(),
            ranks: vec![0; n],
        }
    }

    pub(crate) fn union(&mut self, x: usize, y: usize) {
        let r = self.root(x);
        let s = self.root(y);

        if r == s {
            return;
        }

        match self.ranks[r].cmp(&self.ranks[s]) {
            std::cmp::Ordering::Greater => {
                self.parents[s] = r;
            }
            std::cmp::Ordering::Less => {
                self.parents[r] = s;
            }
            std::cmp::Ordering::Equal => {
                self.parents[r] = s;
                self.ranks[s] += 1;
            }
        }
    }

    /// The sets as lists of members.  Sets are ordered by their smallest
    /// member and members appear in increasing order.
    pub(crate) fn sets(&mut self) -> Vec<Vec<usize>> {
        let n = self.parents.len();
        let mut slot = vec![usize::MAX; n];
        let mut sets: Vec<Vec<usize>> = Vec::new();
        for x in 0..n {
            let r = self.root(x);
            if slot[r] == usize::MAX {
                slot[r] = sets.len();
                sets.push(Vec::new());
            }
            sets[slot[r]].push(x);
        }
        sets
    }

    fn root(&mut self, x: usize) -> usize {
        let mut r = x;
        while r != self.parents[r] {
            self.parents[r] = self.parents[self.parents[r]]; //path halving
            r = self.parents[r];
        }
        r
    }
}

#[test]
fn test_union() {
    // basic union operations
    let mut dsu = DisjointSetUnion::new(5);
    dsu.union(0, 1);
    dsu.union(2, 3);
    dsu.union(1, 2);
    assert_eq!(dsu.sets(), vec![vec![0, 1, 2, 3], vec![4]]);

    // entry union with itself
    let mut dsu = DisjointSetUnion::new(5);
    dsu.union(0, 0);
    assert_eq!(dsu.sets(), (0..5).map(|i| vec![i]).collect::<Vec<_>>());

    // Test union with larger set
    let mut dsu = DisjointSetUnion::new(10);
    dsu.union(0, 1);
    dsu.union(2, 3);
    dsu.union(1, 2);
    dsu.union(0, 4);
    dsu.union(5, 6);
    dsu.union(7, 8);
    dsu.union(4, 6);
    dsu.union(3, 8);
    assert_eq!(dsu.sets(), vec![(0..9).collect::<Vec<_>>(), vec![9]]);
}

#[test]
fn test_deep_chain_root() {
    // long chains built by repeated unions must still resolve
    // every member to the same root
    let n = 64;
    let mut dsu = DisjointSetUnion::new(n);
    for i in 1..n {
        dsu.union(i - 1, i);
    }
    let r = dsu.root(0);
    assert!((0..n).all(|i| dsu.root(i) == r));
}

#[test]
fn test_sets() {
    let mut dsu = DisjointSetUnion::new(6);
    assert_eq!(dsu.sets().len(), 6);

    dsu.union(4, 1);
    dsu.union(5, 3);
    dsu.union(3, 0);
    assert_eq!(dsu.sets(), vec![vec![0, 3, 5], vec![1, 4], vec![2]]);

    let mut empty = DisjointSetUnion::new(0);
    assert!(empty.sets().is_empty());
}
