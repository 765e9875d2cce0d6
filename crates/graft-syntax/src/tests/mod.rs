//! Unit and behaviour tests for `graft-syntax`.
