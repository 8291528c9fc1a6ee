pub mod assignment;
pub mod class;
pub mod course;
pub mod progress;
pub mod todo;

pub use assignment::{
    Assignment, AssignmentKind, AssignmentStatus, NewAssignmentRequest, Priority,
    UpdateAssignmentRequest,
};
pub use class::{ClassRecord, NewClassRequest, UpdateClassRequest};
pub use course::{Course, DeletedCourse, NewCourseRequest, UpdateCourseRequest};
pub use progress::{HomeworkStatus, ModuleProgress, ProgressQuery, UpsertProgressRequest};
pub use todo::{NewTodoRequest, Todo, UpdateTodoRequest};
